use crate::types::NodeId;
use std::collections::HashMap;

/// Kind of declaration the identity table can bind references to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationKind {
    Function,
    Class,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Declaration {
    pub id: NodeId,
    pub kind: DeclarationKind,
}

/// Per-build id counter plus the (file, name) -> declaration table.
///
/// Ids start at 0 and strictly increase. Redeclaring a name in the same file
/// shadows the earlier entry for [`lookup_declaration`](Self::lookup_declaration);
/// every entry is kept so lookups can be bounded by allocation order.
#[derive(Debug, Default)]
pub struct IdentityAllocator {
    next: u64,
    declarations: HashMap<String, HashMap<String, Vec<Declaration>>>,
}

impl IdentityAllocator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> NodeId {
        let id = NodeId(self.next);
        self.next += 1;
        id
    }

    /// Number of ids handed out so far
    #[must_use]
    pub const fn allocated(&self) -> u64 {
        self.next
    }

    pub fn record_declaration(&mut self, file: &str, name: &str, id: NodeId, kind: DeclarationKind) {
        self.declarations
            .entry(file.to_string())
            .or_default()
            .entry(name.to_string())
            .or_default()
            .push(Declaration { id, kind });
    }

    /// Latest declaration of `name` in `file`
    #[must_use]
    pub fn lookup_declaration(&self, file: &str, name: &str) -> Option<Declaration> {
        self.entries(file, name)?.last().copied()
    }

    /// Latest declaration of `name` in `file` allocated before `horizon`
    #[must_use]
    pub fn lookup_declaration_before(
        &self,
        file: &str,
        name: &str,
        horizon: NodeId,
    ) -> Option<Declaration> {
        self.entries(file, name)?
            .iter()
            .rev()
            .find(|decl| decl.id < horizon)
            .copied()
    }

    fn entries(&self, file: &str, name: &str) -> Option<&Vec<Declaration>> {
        self.declarations.get(file)?.get(name)
    }
}
