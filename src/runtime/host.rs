//! The in-process host: classpath, class loading and invocation.
//!
//! # Class Loading
//!
//! Classes are *defined* first ([`Runtime::define`]), which makes them
//! resolvable by name, and *loaded* lazily on first use or explicitly through
//! [`Runtime::load`]. Loading runs every installed [`ClassTransformer`] once;
//! the interceptions they return are fixed for the lifetime of the loaded
//! class. Transformers installed later only see classes loaded later.
//!
//! The loaded-class table is a `DashMap`, and transformation runs while the
//! vacant entry is held, so concurrent loaders of the same class observe
//! exactly one transformation pass.
//!
//! # Examples
//!
//! ```rust
//! use mockrunner::runtime::{ClassDef, MethodDef, Runtime};
//! use mockrunner::Value;
//!
//! let runtime = Runtime::new();
//! runtime.define(
//!     ClassDef::class("svc.Store")
//!         .with_method(MethodDef::new("getCount", "int", |_| Ok(Value::Int(0)))),
//! );
//!
//! assert_eq!(runtime.invoke("svc.Store", "getCount", &[])?, Value::Int(0));
//! assert!(runtime.is_loaded("svc.Store"));
//! # Ok::<(), mockrunner::Error>(())
//! ```

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, RwLock,
};

use dashmap::{mapref::entry::Entry, DashMap};
use log::debug;
use rayon::prelude::*;

use crate::{
    intercept::{CallContext, Interceptor},
    runtime::ClassDef,
    typesystem::ClassRegistry,
    value::Value,
    Error, Result,
};

/// A hook run by the host once for every class it loads.
pub trait ClassTransformer: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// Inspects a loading class and returns the interceptions to attach.
    fn transform(&self, class: &ClassDef) -> Vec<MethodInterception>;
}

/// An interceptor to attach to one method of a loading class.
#[derive(Clone, Debug)]
pub struct MethodInterception {
    /// Index into [`ClassDef::methods`]
    pub method_index: usize,
    /// The interceptor to run instead of the method
    pub interceptor: Arc<Interceptor>,
}

/// A class after loading, with its attached interceptions.
#[derive(Debug)]
pub struct LoadedClass {
    def: Arc<ClassDef>,
    interceptors: Vec<Option<Arc<Interceptor>>>,
}

impl LoadedClass {
    /// The class definition.
    #[must_use]
    pub fn def(&self) -> &ClassDef {
        &self.def
    }

    /// The interceptor attached to the method at `index`, if any.
    #[must_use]
    pub fn interceptor(&self, index: usize) -> Option<&Arc<Interceptor>> {
        self.interceptors.get(index).and_then(Option::as_ref)
    }

    /// Names of intercepted methods, in declaration order, overloads repeated.
    #[must_use]
    pub fn intercepted_methods(&self) -> Vec<&str> {
        self.interceptors
            .iter()
            .zip(&self.def.methods)
            .filter(|(interceptor, _)| interceptor.is_some())
            .map(|(_, method)| method.name.as_str())
            .collect()
    }
}

/// Classpath, loaded classes and installed transformers.
pub struct Runtime {
    registry: Arc<ClassRegistry>,
    classpath: DashMap<String, Arc<ClassDef>>,
    loaded: DashMap<String, Arc<LoadedClass>>,
    transformers: RwLock<Vec<Arc<dyn ClassTransformer>>>,
    transform_passes: AtomicUsize,
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

impl Runtime {
    /// Creates a host whose registry holds the standard types.
    #[must_use]
    pub fn new() -> Self {
        Self::with_registry(Arc::new(ClassRegistry::with_builtins()))
    }

    /// Creates a host over an existing registry.
    #[must_use]
    pub fn with_registry(registry: Arc<ClassRegistry>) -> Self {
        Self {
            registry,
            classpath: DashMap::new(),
            loaded: DashMap::new(),
            transformers: RwLock::new(Vec::new()),
            transform_passes: AtomicUsize::new(0),
        }
    }

    /// The registry classes are registered in on definition.
    #[must_use]
    pub fn registry(&self) -> &Arc<ClassRegistry> {
        &self.registry
    }

    /// Puts a class on the classpath and registers its type.
    ///
    /// Redefining an already loaded class does not affect the loaded version.
    pub fn define(&self, class: ClassDef) -> Arc<ClassDef> {
        self.registry.register(class.type_def());
        let class = Arc::new(class);
        self.classpath.insert(class.name.clone(), class.clone());
        class
    }

    /// Installs a transformer for classes loaded from now on.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LockError`] if the transformer list is poisoned.
    pub fn add_transformer(&self, transformer: Arc<dyn ClassTransformer>) -> Result<()> {
        debug!("Installing class transformer '{}'", transformer.name());
        write_lock!(self.transformers).push(transformer);
        Ok(())
    }

    /// Loads a class, transforming it on first load.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ClassNotFound`] if the class was never defined and
    /// [`Error::LockError`] if the transformer list is poisoned.
    pub fn load(&self, name: &str) -> Result<Arc<LoadedClass>> {
        if let Some(loaded) = self.loaded.get(name) {
            return Ok(loaded.clone());
        }

        let def = self
            .classpath
            .get(name)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| Error::ClassNotFound(name.to_string()))?;
        let transformers = read_lock!(self.transformers).clone();

        match self.loaded.entry(name.to_string()) {
            Entry::Occupied(entry) => Ok(entry.get().clone()),
            Entry::Vacant(entry) => {
                let loaded = Arc::new(self.transform(def, &transformers));
                entry.insert(loaded.clone());
                Ok(loaded)
            }
        }
    }

    fn transform(
        &self,
        def: Arc<ClassDef>,
        transformers: &[Arc<dyn ClassTransformer>],
    ) -> LoadedClass {
        self.transform_passes.fetch_add(1, Ordering::Relaxed);
        let mut interceptors: Vec<Option<Arc<Interceptor>>> = vec![None; def.methods.len()];

        for transformer in transformers {
            for interception in transformer.transform(&def) {
                match interceptors.get_mut(interception.method_index) {
                    Some(slot) if slot.is_none() => *slot = Some(interception.interceptor),
                    Some(_) => debug!(
                        "'{}' skipped {}: method {} already intercepted",
                        transformer.name(),
                        def.name,
                        interception.method_index
                    ),
                    None => debug!(
                        "'{}' returned invalid method index {} for {}",
                        transformer.name(),
                        interception.method_index,
                        def.name
                    ),
                }
            }
        }

        LoadedClass { def, interceptors }
    }

    /// Loads several classes in parallel.
    ///
    /// # Errors
    ///
    /// Returns the first load error encountered.
    pub fn load_all(&self, names: &[&str]) -> Result<Vec<Arc<LoadedClass>>> {
        names.par_iter().map(|name| self.load(name)).collect()
    }

    /// Invokes a method, loading its class if needed.
    ///
    /// The overload is chosen by argument count. An intercepted method runs
    /// through its interceptor; otherwise the body runs directly.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ClassNotFound`], [`Error::MethodNotFound`],
    /// [`Error::AbstractMethod`] for a bodiless method without interception,
    /// or whatever the interceptor or body returns.
    pub fn invoke(&self, class_name: &str, method_name: &str, args: &[Value]) -> Result<Value> {
        let loaded = self.load(class_name)?;
        let (index, method) = loaded.def.find_method(method_name, args.len()).ok_or_else(|| {
            Error::MethodNotFound {
                class_name: class_name.to_string(),
                method_name: method_name.to_string(),
            }
        })?;

        if let Some(interceptor) = loaded.interceptor(index) {
            let ctx = CallContext::new(class_name, method_name).with_args(args);
            return interceptor.intercept(&ctx, method.body.as_deref());
        }

        match &method.body {
            Some(body) => body(args),
            None => Err(Error::AbstractMethod {
                class_name: class_name.to_string(),
                method_name: method_name.to_string(),
            }),
        }
    }

    /// Returns `true` if the class has been loaded.
    #[must_use]
    pub fn is_loaded(&self, name: &str) -> bool {
        self.loaded.contains_key(name)
    }

    /// Names of defined classes, sorted.
    #[must_use]
    pub fn defined_classes(&self) -> Vec<String> {
        let mut names: Vec<String> = self.classpath.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    /// Number of transformation passes run so far (one per loaded class).
    #[must_use]
    pub fn transform_passes(&self) -> usize {
        self.transform_passes.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        intercept::{InterceptionStrategy, MockEngine},
        rules::RuleStore,
        runtime::MethodDef,
    };

    struct InterceptAll {
        engine: Arc<MockEngine>,
    }

    impl ClassTransformer for InterceptAll {
        fn name(&self) -> &str {
            "intercept-all"
        }

        fn transform(&self, class: &ClassDef) -> Vec<MethodInterception> {
            class
                .methods
                .iter()
                .enumerate()
                .map(|(method_index, m)| MethodInterception {
                    method_index,
                    interceptor: Arc::new(Interceptor::new(
                        self.engine.clone(),
                        class.name.clone(),
                        m.name.clone(),
                        InterceptionStrategy::Concrete,
                    )),
                })
                .collect()
        }
    }

    fn runtime() -> Runtime {
        let runtime = Runtime::new();
        runtime.define(
            ClassDef::class("svc.Store")
                .with_method(MethodDef::new("getCount", "int", |_| Ok(Value::Int(0))))
                .with_method(MethodDef::abstract_method("pending", "int")),
        );
        runtime
    }

    #[test]
    fn invoke_runs_body_or_fails_abstract() {
        let runtime = runtime();
        assert_eq!(runtime.invoke("svc.Store", "getCount", &[]).unwrap(), Value::Int(0));
        assert!(matches!(
            runtime.invoke("svc.Store", "pending", &[]),
            Err(Error::AbstractMethod { .. })
        ));
        assert!(matches!(
            runtime.invoke("svc.Store", "missing", &[]),
            Err(Error::MethodNotFound { .. })
        ));
        assert!(matches!(
            runtime.invoke("svc.Nope", "x", &[]),
            Err(Error::ClassNotFound(_))
        ));
    }

    #[test]
    fn define_registers_type() {
        let runtime = runtime();
        assert!(runtime.registry().contains("svc.Store"));
        assert_eq!(runtime.defined_classes(), vec!["svc.Store"]);
    }

    #[test]
    fn transformers_apply_only_to_later_loads() {
        let runtime = runtime();
        runtime.load("svc.Store").unwrap();

        let engine = Arc::new(MockEngine::new(
            Arc::new(RuleStore::new()),
            runtime.registry().clone(),
        ));
        runtime
            .add_transformer(Arc::new(InterceptAll { engine }))
            .unwrap();

        let loaded = runtime.load("svc.Store").unwrap();
        assert!(loaded.intercepted_methods().is_empty());
        assert_eq!(runtime.transform_passes(), 1);
    }

    #[test]
    fn first_transformer_wins() {
        let runtime = runtime();
        let engine = Arc::new(MockEngine::new(
            Arc::new(RuleStore::new()),
            runtime.registry().clone(),
        ));
        runtime
            .add_transformer(Arc::new(InterceptAll { engine: engine.clone() }))
            .unwrap();
        runtime
            .add_transformer(Arc::new(InterceptAll { engine }))
            .unwrap();

        let loaded = runtime.load("svc.Store").unwrap();
        assert_eq!(loaded.intercepted_methods(), vec!["getCount", "pending"]);
        assert_eq!(runtime.invoke("svc.Store", "getCount", &[]).unwrap(), Value::Int(0));
    }
}
