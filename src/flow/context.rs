use std::cell::RefCell;
use std::marker::PhantomData;
use std::sync::Arc;

use super::FlowGraph;

thread_local! {
    static FLOW_STACK: RefCell<Vec<Arc<dyn FlowGraph>>> = RefCell::new(Vec::new());
}

/// The innermost flow entered on this thread, if any.
pub fn current_flow() -> Option<Arc<dyn FlowGraph>> {
    FLOW_STACK.with(|stack| stack.borrow().last().cloned())
}

/// Guard that keeps a flow ambient for the current thread until it is dropped.
///
/// Scopes nest. Dropping a guard, including during unwinding, restores whatever
/// was ambient when it was entered.
#[must_use = "the flow stops being ambient as soon as the scope is dropped"]
pub struct FlowScope {
    depth: usize,
    // Tied to the thread whose stack it pushed onto.
    _not_send: PhantomData<*const ()>,
}

impl FlowScope {
    pub fn enter(flow: Arc<dyn FlowGraph>) -> Self {
        let depth = FLOW_STACK.with(|stack| {
            let mut stack = stack.borrow_mut();
            stack.push(flow);
            stack.len()
        });
        Self {
            depth,
            _not_send: PhantomData,
        }
    }
}

impl Drop for FlowScope {
    fn drop(&mut self) {
        // `try_with` because the thread-local may already be gone during thread teardown.
        let _ = FLOW_STACK.try_with(|stack| {
            stack.borrow_mut().truncate(self.depth - 1);
        });
    }
}

/// Runs `f` with `flow` as the ambient flow.
pub fn with_flow<R>(flow: Arc<dyn FlowGraph>, f: impl FnOnce() -> R) -> R {
    let _scope = FlowScope::enter(flow);
    f()
}
