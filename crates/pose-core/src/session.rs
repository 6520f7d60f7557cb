//! Open documents plus the active document/node tracked across the app

use crate::document::Document;
use crate::events::{EventHub, Propagation};
use crate::scene::{DocumentId, NodeId};

/// Notifications published when the active document or node changes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    ActiveDocumentChanged {
        previous: Option<DocumentId>,
        current: Option<DocumentId>,
    },
    ActiveNodeChanged {
        previous: Option<NodeId>,
        current: Option<NodeId>,
    },
}

impl Propagation for SessionEvent {}

/// Open documents and what is active in them
#[derive(Debug, Default)]
pub struct Session {
    documents: Vec<Document>,
    active_document: Option<DocumentId>,
    active_node: Option<NodeId>,
    events: EventHub<SessionEvent>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Session notification hub
    pub fn events(&self) -> &EventHub<SessionEvent> {
        &self.events
    }

    // ============== Documents ==============

    /// Add a document and make it active
    pub fn open_document(&mut self, document: Document) -> DocumentId {
        let id = document.id;
        tracing::debug!("Opening document '{}' ({})", document.name, id);
        self.documents.push(document);
        self.set_active_document(Some(id));
        id
    }

    /// Close a document; when it was active, the next one (if any) takes over
    pub fn close_document(&mut self, id: DocumentId) -> Option<Document> {
        let index = self.documents.iter().position(|d| d.id == id)?;
        if self.active_document == Some(id) {
            let next = self
                .documents
                .get(index + 1)
                .or_else(|| index.checked_sub(1).and_then(|i| self.documents.get(i)))
                .map(|d| d.id);
            self.set_active_document(next);
        }
        Some(self.documents.remove(index))
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn document(&self, id: DocumentId) -> Option<&Document> {
        self.documents.iter().find(|d| d.id == id)
    }

    pub fn document_mut(&mut self, id: DocumentId) -> Option<&mut Document> {
        self.documents.iter_mut().find(|d| d.id == id)
    }

    pub fn active_document_id(&self) -> Option<DocumentId> {
        self.active_document
    }

    pub fn active_document(&self) -> Option<&Document> {
        self.active_document.and_then(|id| self.document(id))
    }

    pub fn active_document_mut(&mut self) -> Option<&mut Document> {
        let id = self.active_document?;
        self.document_mut(id)
    }

    /// Switch the active document; the active node is cleared first
    pub fn set_active_document(&mut self, id: Option<DocumentId>) {
        let id = id.filter(|id| self.document(*id).is_some());
        if self.active_document == id {
            return;
        }
        self.set_active_node(None);
        let previous = std::mem::replace(&mut self.active_document, id);
        self.events.emit(SessionEvent::ActiveDocumentChanged {
            previous,
            current: id,
        });
    }

    // ============== Active node ==============

    pub fn active_node(&self) -> Option<NodeId> {
        self.active_node
    }

    /// Set the active node; ids not in the active document are treated as `None`
    pub fn set_active_node(&mut self, id: Option<NodeId>) {
        let id = id.filter(|id| {
            self.active_document()
                .is_some_and(|doc| doc.scene.node(*id).is_some())
        });
        if self.active_node == id {
            return;
        }
        let previous = std::mem::replace(&mut self.active_node, id);
        self.events.emit(SessionEvent::ActiveNodeChanged {
            previous,
            current: id,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    use crate::scene::Node;

    fn record(session: &Session) -> (Arc<Mutex<Vec<SessionEvent>>>, crate::events::Subscription) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = log.clone();
        let sub = session.events().subscribe(move |e| sink.lock().push(*e));
        (log, sub)
    }

    #[test]
    fn test_open_document_activates_it() {
        let mut session = Session::new();
        let (log, _sub) = record(&session);
        let id = session.open_document(Document::new("a"));

        assert_eq!(session.active_document_id(), Some(id));
        assert_eq!(
            log.lock().as_slice(),
            &[SessionEvent::ActiveDocumentChanged {
                previous: None,
                current: Some(id)
            }]
        );
    }

    #[test]
    fn test_switching_document_clears_active_node() {
        let mut session = Session::new();
        let mut doc = Document::new("a");
        let node = doc.scene.add_node(Node::new("n"), None).unwrap();
        let a = session.open_document(doc);
        session.set_active_node(Some(node));
        assert_eq!(session.active_node(), Some(node));

        let (log, _sub) = record(&session);
        let b = session.open_document(Document::new("b"));
        assert_eq!(session.active_node(), None);
        assert_eq!(
            log.lock().as_slice(),
            &[
                SessionEvent::ActiveNodeChanged {
                    previous: Some(node),
                    current: None
                },
                SessionEvent::ActiveDocumentChanged {
                    previous: Some(a),
                    current: Some(b)
                },
            ]
        );
    }

    #[test]
    fn test_unknown_node_is_ignored() {
        let mut session = Session::new();
        session.open_document(Document::new("a"));
        session.set_active_node(Some(NodeId::new()));
        assert_eq!(session.active_node(), None);
    }

    #[test]
    fn test_close_active_document_activates_neighbour() {
        let mut session = Session::new();
        let a = session.open_document(Document::new("a"));
        let b = session.open_document(Document::new("b"));
        assert!(session.close_document(b).is_some());
        assert_eq!(session.active_document_id(), Some(a));
        assert!(session.close_document(a).is_some());
        assert_eq!(session.active_document_id(), None);
    }
}
