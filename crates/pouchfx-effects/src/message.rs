use crate::document::{Document, PutResponse, ReplicationResult, SyncResult};
use crate::error::Error;

/// Request, response and failure messages for every store operation.
///
/// `Request*` variants express intent; exactly one success or `Fail*`
/// variant follows each request that is acted upon. Failures carry the
/// store's error untouched.
#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    RequestPut { value: Document },
    RespondPut { value: PutResponse },
    FailPut { error: Error },

    RequestRestore,
    /// Documents in the order the store returned its rows.
    RespondRestore { value: Vec<Document> },
    FailRestore { error: Error },

    RequestPush,
    CompletePush { value: ReplicationResult },
    FailPush { error: Error },

    RequestPull,
    CompletePull { value: ReplicationResult },
    FailPull { error: Error },

    RequestSync,
    CompleteSync { value: SyncResult },
    FailSync { error: Error },
}

impl Msg {
    /// The message tag, e.g. `"RespondPut"`.
    pub fn kind(&self) -> &'static str {
        match self {
            Msg::RequestPut { .. } => "RequestPut",
            Msg::RespondPut { .. } => "RespondPut",
            Msg::FailPut { .. } => "FailPut",
            Msg::RequestRestore => "RequestRestore",
            Msg::RespondRestore { .. } => "RespondRestore",
            Msg::FailRestore { .. } => "FailRestore",
            Msg::RequestPush => "RequestPush",
            Msg::CompletePush { .. } => "CompletePush",
            Msg::FailPush { .. } => "FailPush",
            Msg::RequestPull => "RequestPull",
            Msg::CompletePull { .. } => "CompletePull",
            Msg::FailPull { .. } => "FailPull",
            Msg::RequestSync => "RequestSync",
            Msg::CompleteSync { .. } => "CompleteSync",
            Msg::FailSync { .. } => "FailSync",
        }
    }

    /// The carried error, for `Fail*` messages.
    pub fn error(&self) -> Option<&Error> {
        match self {
            Msg::FailPut { error }
            | Msg::FailRestore { error }
            | Msg::FailPush { error }
            | Msg::FailPull { error }
            | Msg::FailSync { error } => Some(error),
            _ => None,
        }
    }
}
