use std::ops::Deref;

use super::Engine;
use crate::errors::TorkResult;

/// Wraps a `text -> text` function so its input and output are both
/// governed.
///
/// The returned closure governs the argument as input, calls `f` with the
/// governed text, then governs what `f` returned as output. Either leg fails
/// with the engine's error, and `f` is not called when the input leg fails.
///
/// `engine` may be `&Engine`, `Arc<Engine>` or anything else that derefs to
/// an [`Engine`].
pub fn governed<E, F>(engine: E, f: F) -> impl Fn(&str) -> TorkResult<String>
where
    E: Deref<Target = Engine>,
    F: Fn(&str) -> String,
{
    move |text: &str| {
        let input = engine.govern_input(text)?;
        let reply = f(&input.output);
        Ok(engine.govern_output(&reply)?.output)
    }
}
