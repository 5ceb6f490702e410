//! Load-time selection of the methods to intercept.

use std::sync::Arc;

use log::{debug, info, warn};

use crate::{
    intercept::{InterceptionStrategy, Interceptor, MockEngine},
    runtime::{is_initializer_name, ClassDef, ClassTransformer, MethodDef, MethodInterception},
};

/// Attaches interceptors to the methods the rule store names.
///
/// Runs once per loading class. For every rule owned by that exact class it
/// intercepts all overloads of the named method. Rules are attached whether
/// or not they are enabled; `enabled` is checked on each call. Rules added
/// after a class has loaded never apply to it.
pub struct ClassTransformationSelector {
    engine: Arc<MockEngine>,
}

impl ClassTransformationSelector {
    /// Creates a selector reading rules from `engine`.
    #[must_use]
    pub fn new(engine: Arc<MockEngine>) -> Self {
        Self { engine }
    }

    /// The strategy used for `method` of `class`.
    #[must_use]
    pub fn strategy_for(class: &ClassDef, method: &MethodDef) -> InterceptionStrategy {
        if class.is_interface() || !method.has_body() {
            InterceptionStrategy::Interface
        } else {
            InterceptionStrategy::Concrete
        }
    }
}

impl ClassTransformer for ClassTransformationSelector {
    fn name(&self) -> &str {
        "mock-selector"
    }

    fn transform(&self, class: &ClassDef) -> Vec<MethodInterception> {
        if !self.engine.store().has_rules_for(&class.name) {
            return Vec::new();
        }

        let rules = self.engine.store().rules_for_class(&class.name);
        let mut interceptions = Vec::new();

        for (method_name, _) in rules {
            if is_initializer_name(&method_name) {
                warn!(
                    "Ignoring rule for {}.{}: constructors and initializers are not intercepted",
                    class.name, method_name
                );
                continue;
            }

            let before = interceptions.len();
            for (method_index, method) in class.methods_named(&method_name) {
                let strategy = Self::strategy_for(class, method);
                info!(
                    "Intercepting {}.{}{} ({strategy})",
                    class.name,
                    method.name,
                    method.signature()
                );
                interceptions.push(MethodInterception {
                    method_index,
                    interceptor: Arc::new(Interceptor::new(
                        self.engine.clone(),
                        class.name.clone(),
                        method_name.clone(),
                        strategy,
                    )),
                });
            }

            if interceptions.len() == before {
                debug!(
                    "Rule {}.{} names no declared method",
                    class.name, method_name
                );
            }
        }

        interceptions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        rules::{MockRule, RuleStore},
        runtime::MethodDef,
        test::fixture_registry,
        value::Value,
    };

    fn selector(rules: &[(&str, &str)]) -> ClassTransformationSelector {
        let store = RuleStore::new();
        for (class, method) in rules {
            store.add_rule(class, method, MockRule::returning("1", "int").with_enabled(false));
        }
        let engine = MockEngine::new(Arc::new(store), Arc::new(fixture_registry()));
        ClassTransformationSelector::new(Arc::new(engine))
    }

    fn store_class() -> ClassDef {
        ClassDef::class("svc.Store")
            .with_method(MethodDef::new("get", "int", |_| Ok(Value::Int(0))))
            .with_method(MethodDef::new("get", "int", |_| Ok(Value::Int(0))).with_params(["int"]))
            .with_method(MethodDef::new("size", "int", |_| Ok(Value::Int(0))))
            .with_method(MethodDef::abstract_method("pending", "int"))
            .with_method(MethodDef::new("<init>", "void", |_| Ok(Value::Null)))
    }

    #[test]
    fn intercepts_all_overloads_even_when_disabled() {
        let selector = selector(&[("svc.Store", "get")]);
        let interceptions = selector.transform(&store_class());

        let indices: Vec<_> = interceptions.iter().map(|i| i.method_index).collect();
        assert_eq!(indices, vec![0, 1]);
        assert!(interceptions
            .iter()
            .all(|i| i.interceptor.strategy() == InterceptionStrategy::Concrete));
    }

    #[test]
    fn no_prefix_collisions() {
        let selector = selector(&[("svc.Store", "get")]);
        let class = ClassDef::class("svc.StoreImpl")
            .with_method(MethodDef::new("get", "int", |_| Ok(Value::Int(0))));
        assert!(selector.transform(&class).is_empty());
    }

    #[test]
    fn classes_without_rules_are_untouched() {
        assert!(selector(&[]).transform(&store_class()).is_empty());
        assert!(selector(&[("svc.Api", "get")]).transform(&store_class()).is_empty());
    }

    #[test]
    fn strategy_follows_body_and_kind() {
        let selector = selector(&[("svc.Store", "pending"), ("svc.Api", "list")]);

        let interceptions = selector.transform(&store_class());
        assert_eq!(interceptions.len(), 1);
        assert_eq!(interceptions[0].interceptor.strategy(), InterceptionStrategy::Interface);

        let api = ClassDef::interface("svc.Api")
            .with_method(MethodDef::abstract_method("list", "List<svc.Item>"));
        let interceptions = selector.transform(&api);
        assert_eq!(interceptions[0].interceptor.strategy(), InterceptionStrategy::Interface);
        assert_eq!(interceptions[0].interceptor.class_name(), "svc.Api");
    }

    #[test]
    fn skips_initializers_and_unknown_methods() {
        let selector = selector(&[("svc.Store", "<init>"), ("svc.Store", "missing")]);
        assert!(selector.transform(&store_class()).is_empty());
    }
}
