use mortar_core::Value;
use std::sync::{Arc, Mutex};

/// One statement as the connection received it.
#[derive(Debug, Clone, PartialEq)]
pub struct Executed {
    pub sql: String,
    pub params: Vec<Value>,
}

/// A handle on the statements executed through a [`crate::Scripted`]
/// provider.
#[derive(Debug, Clone)]
pub struct ExecLog {
    statements: Arc<Mutex<Vec<Executed>>>,
}

impl ExecLog {
    pub(crate) fn new(statements: Arc<Mutex<Vec<Executed>>>) -> Self {
        Self { statements }
    }

    pub(crate) fn push(&self, executed: Executed) {
        self.statements.lock().unwrap().push(executed);
    }

    /// Get the number of logged statements
    pub fn len(&self) -> usize {
        self.statements.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.lock().unwrap().is_empty()
    }

    /// SQL text of every logged statement, in execution order
    pub fn sql(&self) -> Vec<String> {
        self.statements
            .lock()
            .unwrap()
            .iter()
            .map(|executed| executed.sql.clone())
            .collect()
    }

    /// Remove and return the oldest logged statement
    #[track_caller]
    pub fn pop(&self) -> Executed {
        let mut statements = self.statements.lock().unwrap();
        assert!(!statements.is_empty(), "no statement was executed");
        statements.remove(0)
    }

    pub fn clear(&self) {
        self.statements.lock().unwrap().clear();
    }
}
