//! Post-build action registry keyed by target path patterns.

use crate::models::BuildContext;
use log::debug;
use std::path::Path;

/// Callback run after a matching target has been produced.
pub type PostAction<'a, T> = Box<dyn FnMut(&Path, &BuildContext) -> T + 'a>;

/// Collects post-build actions and fires those whose pattern matches a produced target.
pub struct PostActionRegistry<'a, T> {
    actions: Vec<(String, PostAction<'a, T>)>,
}

impl<T> Default for PostActionRegistry<'_, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T> PostActionRegistry<'a, T> {
    /// Construct an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            actions: Vec::new(),
        }
    }

    /// Register `action` for targets matching `pattern` (after substitution).
    pub fn register(
        &mut self,
        pattern: impl Into<String>,
        action: impl FnMut(&Path, &BuildContext) -> T + 'a,
    ) {
        self.actions.push((pattern.into(), Box::new(action)));
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Run every action registered for `produced`, in registration order.
    pub fn fire(&mut self, ctx: &BuildContext, produced: &Path) -> Vec<T> {
        let mut outputs = Vec::new();
        for (pattern, action) in &mut self.actions {
            let target = ctx.subst(pattern);
            if Path::new(&target) == produced {
                debug!("post-action '{pattern}' triggered by {}", produced.display());
                outputs.push(action(produced, ctx));
            }
        }
        outputs
    }
}
