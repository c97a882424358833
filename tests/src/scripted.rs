use crate::{ExecLog, Executed};

use mortar_core::{
    async_trait,
    driver::{Capability, Connection, ConnectionProvider, Driver, NativeError, Response},
    Error, Record, Result, Value,
};
use std::collections::VecDeque;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};

type ScriptedResponse = std::result::Result<Response, NativeError>;

/// An in-memory provider that answers statements from a script.
///
/// Responses are consumed in order, one per executed statement. Every
/// statement is logged, and acquire/release calls are counted so tests can
/// check that each acquired connection goes back exactly once.
#[derive(Debug, Clone)]
pub struct Scripted {
    capability: &'static Capability,
    shared: Arc<Shared>,
}

#[derive(Debug)]
struct Shared {
    responses: Mutex<VecDeque<ScriptedResponse>>,
    log: ExecLog,
    acquired: AtomicUsize,
    released: AtomicUsize,
    refuse: Mutex<Option<String>>,
}

impl Scripted {
    pub fn new(capability: &'static Capability) -> Self {
        Self {
            capability,
            shared: Arc::new(Shared {
                responses: Mutex::new(VecDeque::new()),
                log: ExecLog::new(Arc::default()),
                acquired: AtomicUsize::new(0),
                released: AtomicUsize::new(0),
                refuse: Mutex::new(None),
            }),
        }
    }

    pub fn mysql() -> Self {
        Self::new(&Capability::MYSQL)
    }

    /// Queues a response for the next statement.
    pub fn respond(&self, response: Response) -> &Self {
        self.push(Ok(response))
    }

    /// Queues a row set for the next statement.
    pub fn rows(&self, rows: Vec<Record>) -> &Self {
        self.respond(Response::values(rows))
    }

    /// Queues a failure for the next statement.
    pub fn fail(&self, err: NativeError) -> &Self {
        self.push(Err(err))
    }

    /// Makes every following acquire fail.
    pub fn refuse_connections(&self, message: &str) {
        *self.shared.refuse.lock().unwrap() = Some(message.to_string());
    }

    fn push(&self, response: ScriptedResponse) -> &Self {
        self.shared.responses.lock().unwrap().push_back(response);
        self
    }

    pub fn log(&self) -> &ExecLog {
        &self.shared.log
    }

    pub fn acquired(&self) -> usize {
        self.shared.acquired.load(Ordering::SeqCst)
    }

    pub fn released(&self) -> usize {
        self.shared.released.load(Ordering::SeqCst)
    }

    /// Responses queued but never consumed
    pub fn pending(&self) -> usize {
        self.shared.responses.lock().unwrap().len()
    }

    /// A connection outside of the provider, for leased sessions.
    pub fn connection(&self) -> ScriptedConnection {
        ScriptedConnection {
            capability: self.capability,
            shared: self.shared.clone(),
        }
    }
}

#[async_trait]
impl ConnectionProvider for Scripted {
    fn capability(&self) -> &'static Capability {
        self.capability
    }

    async fn acquire(&self) -> Result<Box<dyn Connection>> {
        if let Some(message) = &*self.shared.refuse.lock().unwrap() {
            return Err(Error::connection(message.clone()));
        }

        self.shared.acquired.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(self.connection()))
    }

    fn release(&self, connection: Box<dyn Connection>) {
        self.shared.released.fetch_add(1, Ordering::SeqCst);
        drop(connection);
    }
}

#[async_trait]
impl Driver for Scripted {
    fn capability(&self) -> &'static Capability {
        self.capability
    }

    async fn connect(&self) -> Result<Box<dyn Connection>> {
        Ok(Box::new(self.connection()))
    }
}

#[derive(Debug)]
pub struct ScriptedConnection {
    capability: &'static Capability,
    shared: Arc<Shared>,
}

#[async_trait]
impl Connection for ScriptedConnection {
    fn capability(&self) -> &'static Capability {
        self.capability
    }

    async fn exec(
        &mut self,
        sql: &str,
        params: &[Value],
    ) -> std::result::Result<Response, NativeError> {
        self.shared.log.push(Executed {
            sql: sql.to_string(),
            params: params.to_vec(),
        });

        self.shared
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(NativeError::transport(format!(
                    "no scripted response; sql={sql}"
                )))
            })
    }
}
