//! Form action resolution.
//!
//! Under hash routing the document's own location never changes, so
//! resolving an action-less form against the document would submit to
//! the wrong URL whenever the active page was loaded externally -- the
//! common case. The effective default target is therefore the *active
//! page's* URL.

use crate::page::Form;
use crate::path;
use crate::session::NavSession;

/// Compute the effective submission target for a form.
///
/// An explicit action wins, resolved against the active page's
/// directory when relative. Without one, the active page's pathname is
/// the target; the document's is only the fail-safe fallback (an empty
/// history stack, which cannot occur after a commit).
pub fn resolve_action(form: &Form, session: &NavSession) -> String {
    match &form.action {
        Some(action) if path::is_relative(action) => {
            path::make_path_absolute(action, &session.active_page_url().directory)
        },
        Some(action) => action.clone(),
        None => session.active_page_url().pathname(),
    }
}
