use crate::error::Error;
use crate::value::Value;
use futures::future::BoxFuture;
use lazy_static::lazy_static;
use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, RwLock};

/// A custom Sass function implemented on the host.
///
/// Invoked when the compiler evaluates a call to a signature registered via
/// [`crate::Settings::function`] or passed as a [`Value::HostFunction`].
/// The callback may suspend; its error is reported to the stylesheet as a
/// Sass `@error`.
pub type SassFunction =
    Arc<dyn Fn(Vec<Value>) -> BoxFuture<'static, anyhow::Result<Value>> + Send + Sync>;

/// Wrap an async closure as a [`SassFunction`].
pub fn function<F, Fut>(f: F) -> SassFunction
where
    F: Fn(Vec<Value>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<Value>> + Send + 'static,
{
    Arc::new(move |arguments| Box::pin(f(arguments)))
}

lazy_static! {
    static ref DYNAMIC_FUNCTIONS: RwLock<HashMap<u32, SassDynamicFunction>> =
        RwLock::new(HashMap::new());
}

static NEXT_FUNCTION_ID: AtomicU32 = AtomicU32::new(4000);

/// A host function that can be passed to the compiler as a first-class
/// value. Registered process-wide under a monotonic ID, because the
/// compiler may call it from any compilation that the value reaches.
#[derive(Clone)]
pub struct SassDynamicFunction {
    id: u32,
    signature: String,
    function: SassFunction,
}

impl SassDynamicFunction {
    pub fn new(signature: impl Into<String>, function: SassFunction) -> Self {
        let this = Self {
            id: NEXT_FUNCTION_ID.fetch_add(1, Ordering::Relaxed),
            signature: signature.into(),
            function,
        };
        DYNAMIC_FUNCTIONS
            .write()
            .unwrap()
            .insert(this.id, this.clone());
        this
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn signature(&self) -> &str {
        &self.signature
    }

    pub(crate) fn function(&self) -> SassFunction {
        self.function.clone()
    }
}

impl std::fmt::Debug for SassDynamicFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SassDynamicFunction")
            .field("id", &self.id)
            .field("signature", &self.signature)
            .finish()
    }
}

/// Resolve a `FunctionCallRequest.function_id` to its registered function.
pub(crate) fn lookup(id: u32) -> Option<SassDynamicFunction> {
    DYNAMIC_FUNCTIONS.read().unwrap().get(&id).cloned()
}

/// Extract the function name from a signature like `my-quote($arg)`.
pub(crate) fn signature_name(signature: &str) -> Result<&str, Error> {
    let name = signature.split('(').next().unwrap_or("").trim();
    if name.is_empty() || !signature.contains('(') || !signature.ends_with(')') {
        return Err(Error::Lifecycle(format!(
            "malformed function signature '{signature}'"
        )));
    }
    Ok(name)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn signature_names() {
        assert_eq!(signature_name("myQuote($arg)").unwrap(), "myQuote");
        assert_eq!(signature_name("a-b($x, $y: 2)").unwrap(), "a-b");
        assert!(signature_name("no-parens").is_err());
        assert!(signature_name("($anonymous)").is_err());
        assert!(signature_name("trailing($junk) ").is_err());
    }

    #[test]
    fn dynamic_function_ids_are_unique() {
        let f = function(|_| async { Ok(Value::NULL) });
        let a = SassDynamicFunction::new("a()", f.clone());
        let b = SassDynamicFunction::new("b()", f);

        assert_ne!(a.id(), b.id());
        assert!(lookup(a.id()).is_some());
        assert!(lookup(b.id()).is_some());
        assert!(lookup(u32::MAX).is_none());
    }
}
