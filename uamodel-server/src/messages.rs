// UA Model for Rust
// SPDX-License-Identifier: MPL-2.0

//! Tagged request and response records exchanged with the network layer.
//!
//! The transport decodes a framed message into a [`Request`], hands it to
//! [`NodeManager::handle`], and encodes the returned [`Response`]. The
//! core never calls back into the transport.

use uamodel_types::{
    AddNodesItem, AddNodesResult, AddReferencesItem, BrowseDescription, BrowseResult,
    DeleteNodesItem, DeleteReferencesItem, StatusCode,
};

use crate::NodeManager;

/// A node management or view service request.
#[derive(Debug, Clone)]
pub enum Request {
    /// Add a list of nodes.
    AddNodes(Vec<AddNodesItem>),
    /// Add a list of references.
    AddReferences(Vec<AddReferencesItem>),
    /// Delete a list of nodes.
    DeleteNodes(Vec<DeleteNodesItem>),
    /// Delete a list of references.
    DeleteReferences(Vec<DeleteReferencesItem>),
    /// Browse the references of a list of nodes.
    Browse(Vec<BrowseDescription>),
}

/// The response to a [`Request`], one entry per operation in the request.
#[derive(Debug, Clone)]
pub enum Response {
    /// Results of an AddNodes request.
    AddNodes(Vec<AddNodesResult>),
    /// Results of an AddReferences request.
    AddReferences(Vec<StatusCode>),
    /// Results of a DeleteNodes request.
    DeleteNodes(Vec<StatusCode>),
    /// Results of a DeleteReferences request.
    DeleteReferences(Vec<StatusCode>),
    /// Results of a Browse request.
    Browse(Vec<BrowseResult>),
}

impl NodeManager {
    /// Dispatch a service request to the matching operation. Operation
    /// level failures are reported in the per-item results, never as a
    /// transport error.
    pub fn handle(&self, request: Request) -> Response {
        match request {
            Request::AddNodes(items) => Response::AddNodes(self.add_nodes(&items)),
            Request::AddReferences(items) => Response::AddReferences(self.add_references(&items)),
            Request::DeleteNodes(items) => Response::DeleteNodes(self.delete_nodes(&items)),
            Request::DeleteReferences(items) => {
                Response::DeleteReferences(self.delete_references(&items))
            }
            Request::Browse(items) => Response::Browse(self.browse_many(&items)),
        }
    }
}
