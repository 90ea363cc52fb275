use std::fmt;

/// Statically-typed replacement for the source's exception-driven control
/// flow (`spec.md` §9 Design Notes: "A statically-typed rewrite expresses
/// handler outcome as a three-valued result {ok, transient_failure(err),
/// permanent_failure(err)} and routes on the tag").
///
/// `Transient` follows `spec.md` §4.F's literal retry/dead-letter protocol
/// (decrement `mb-retries`, retry until exhausted, then dead-letter).
/// `Permanent` is this rewrite's one addition: a failure no retry could
/// ever fix — the wire body itself doesn't decode — skips straight to
/// `search.failed` without waiting out the retry budget (see
/// `DESIGN.md`).
#[derive(Debug)]
pub enum Outcome {
    Ok,
    Transient(HandlerError),
    Permanent(HandlerError),
}

/// Boxed handler failure, printable for logging without forcing every
/// caller (router, materializer, dispatcher) onto one concrete error type.
#[derive(Debug)]
pub struct HandlerError(pub Box<dyn std::error::Error + Send + Sync>);

impl fmt::Display for HandlerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<E> From<E> for HandlerError
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn from(err: E) -> Self {
        HandlerError(Box::new(err))
    }
}
