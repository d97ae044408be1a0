use log::info;
use serde_json::json;
use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use task_flow::storage::SqliteStorage;
use task_flow::{
    work_fn, Arguments, Flow, FlowGraph, FlowScope, JsonSerializer, PersistencePort, Task,
    TaskOptions,
};

const DEFAULT_DATABASE_URL: &str = "sqlite:flows.db?mode=rwc";

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    env_logger::init();
    println!("Building the example pipeline flow...");

    // Step 1: Set up the storage backend.
    let database_url = std::env::var("TASK_FLOW_DATABASE_URL")
        .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());
    let storage = SqliteStorage::new(&database_url).await?;
    storage.init().await?;

    // Step 2: Build the tasks inside a flow scope.
    let flow = Arc::new(Flow::new("pipeline").with_name("Example pipeline"));
    let (mut extract, mut transform, mut load) = {
        let _scope = FlowScope::enter(flow.clone());

        let extract = Task::builder()
            .with_work(work_fn("extract", |_args: &Arguments| Ok(json!([1, 2, 3]))))
            .build()?;

        let transform = TaskOptions::from_value(&json!({
            "name": "transform",
            "retries": 2,
            "retry_delay": 10,
            "params": { "factor": 10 },
        }))?
        .into_builder()
        .with_work(work_fn("scale", |args: &Arguments| {
            let factor = args.kwargs.get("factor").and_then(|f| f.as_i64()).unwrap_or(1);
            let rows = args.args.first().and_then(|rows| rows.as_array()).cloned();
            let scaled: Vec<i64> = rows
                .unwrap_or_default()
                .iter()
                .filter_map(|row| row.as_i64())
                .map(|row| row * factor)
                .collect();
            Ok(json!(scaled))
        }))
        .build()?;

        let load = Task::builder()
            .with_name("load")
            .with_retries(-1)
            .with_retry_delay(Duration::from_secs(30))
            .build()?;

        (extract, transform, load)
    };

    // Step 3: Wire the relationships.
    (&extract >> &transform)?;
    (&load << &transform)?;
    for edge in flow.relationships() {
        println!("  {} -> {}", edge.before, edge.after);
    }

    // Step 4: Run the tasks in order. Retries and triggers are the scheduler's job.
    let rows = extract.run(&Arguments::new())?.unwrap_or_default();
    let mut arguments = Arguments::new().arg(rows);
    if let Some(params) = transform.params() {
        arguments.kwargs.extend(params.clone());
    }
    let scaled = transform.run(&arguments)?;
    println!("Transformed rows: {:?}", scaled);
    println!("Load returned: {:?}", load.run(&Arguments::new())?);

    // Step 5: Persist the tasks.
    for task in [&mut extract, &mut transform, &mut load] {
        let record = task.save(&storage).await?;
        info!("Persisted {} in flow '{}'", record.id, record.flow.id);
    }

    // Step 6: Round-trip one task through its transportable form.
    let serializer = JsonSerializer::pretty();
    let bytes = transform.serialize(&serializer)?;
    println!("{}", String::from_utf8_lossy(&bytes));
    let restored = Task::from_serialized(&bytes, &serializer, flow.clone())?;
    println!(
        "Restored {} with {} retries every {:?} (flow '{}')",
        restored.id(),
        restored.retries(),
        restored.retry_delay(),
        flow.id()
    );

    Ok(())
}
