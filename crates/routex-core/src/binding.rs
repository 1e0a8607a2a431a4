//! Parameter binding: turns a step's declared bindings into a [`Params`] view

use crate::context::Context;
use crate::getter::{get_from_first, Getter};
use crate::params::{ParamOrigin, Params};
use crate::registry::{Binding, Step};
use crate::request::{Environment, Request};
use crate::source::Source;
use crate::value::Value;

/// Everything a source specifier can read from during one step
pub(crate) struct Scope<'a> {
    pub cxt: &'a Context,
    pub request: &'a Request,
}

impl Scope<'_> {
    fn lookup(&self, source: &Source) -> Option<Value> {
        match source {
            Source::Context(key) => self.cxt.has(key),
            Source::Path(index) => self.request.path_segments().has(&index.to_string()),
            Source::Query(key) => self.request.query_fields().has(key),
            Source::Form(key) => self.request.form_fields().has(key),
            Source::Env(key) => Environment.has(key),
            Source::Datasource { name, key } => self.cxt.key_value_datasource(name)?.has(key),
        }
    }
}

/// A single source specifier viewed as a getter
///
/// Every specifier carries its own key, so the key passed to `has` (the
/// parameter name) is ignored. A stored `Null` counts as a miss so later
/// specifiers still get a chance.
struct Probe<'s, 'a> {
    scope: &'s Scope<'a>,
    source: &'s Source,
}

impl Getter for Probe<'_, '_> {
    fn has(&self, _param: &str) -> Option<Value> {
        self.scope
            .lookup(self.source)
            .filter(|value| !value.is_null())
    }
}

fn bind_one(scope: &Scope<'_>, binding: &Binding) -> (Value, ParamOrigin) {
    let probes: Vec<Probe<'_, '_>> = binding
        .sources
        .iter()
        .map(|source| Probe { scope, source })
        .collect();
    let getters: Vec<&dyn Getter> = probes.iter().map(|p| p as &dyn Getter).collect();

    let default = binding.default.clone().unwrap_or_default();
    let (value, origin) = get_from_first(&binding.name, default, &getters);

    let origin = match origin.index() {
        Some(index) => ParamOrigin::Source(binding.sources[index].clone()),
        None if binding.default.is_some() => ParamOrigin::Default,
        None => ParamOrigin::Unresolved,
    };
    (value, origin)
}

/// Resolve every binding of `step`; never fails
pub(crate) fn bind_params(step: &Step, scope: &Scope<'_>) -> Params {
    let mut params = Params::new();
    for binding in &step.bindings {
        let (value, origin) = bind_one(scope, binding);
        params.insert(binding.name.clone(), value, origin);
    }
    params
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datasource::MapDatasource;
    use crate::getter::GetterExt;
    use crate::registry::CommandRef;
    use std::sync::Arc;

    fn step(bindings: Vec<Binding>) -> Step {
        Step {
            command: CommandRef::Named("unused".to_string()),
            output: "out".to_string(),
            bindings,
        }
    }

    fn binding(name: &str, specs: &str, default: Option<Value>) -> Binding {
        Binding {
            name: name.to_string(),
            sources: Source::parse_list(specs).unwrap(),
            default,
        }
    }

    #[test]
    fn test_probe_order_context_path_form() {
        let mut cxt = Context::new();
        let request = Request::new("POST /a/b")
            .with_path("/a/b")
            .with_form("foo", "posted");
        let b = binding("p", "cxt:msg path:1 post:foo", None);

        let params = bind_params(&step(vec![b.clone()]), &Scope { cxt: &cxt, request: &request });
        assert_eq!(params.get_string("p", "").unwrap(), "b");
        assert_eq!(params.origin("p"), Some(&ParamOrigin::Source(Source::Path(1))));

        cxt.add("msg", "from context");
        let params = bind_params(&step(vec![b]), &Scope { cxt: &cxt, request: &request });
        assert_eq!(params.get_string("p", "").unwrap(), "from context");
    }

    #[test]
    fn test_default_after_sources() {
        let cxt = Context::new();
        let request = Request::new("GET /");
        let b = binding("p", "cxt:missing", Some(Value::from("Hello World")));

        let params = bind_params(&step(vec![b]), &Scope { cxt: &cxt, request: &request });
        assert_eq!(params.get_string("p", "").unwrap(), "Hello World");
        assert_eq!(params.origin("p"), Some(&ParamOrigin::Default));
    }

    #[test]
    fn test_unresolved_without_default() {
        let cxt = Context::new();
        let request = Request::new("GET /");
        let b = binding("p", "query:nothing", None);

        let params = bind_params(&step(vec![b]), &Scope { cxt: &cxt, request: &request });
        assert_eq!(params.has("p"), None);
        assert_eq!(params.origin("p"), Some(&ParamOrigin::Unresolved));
    }

    #[test]
    fn test_null_in_context_falls_through_to_later_source() {
        let mut cxt = Context::new();
        cxt.add("x", Value::Null);
        let request = Request::new("GET /").with_query("x", "fromquery");
        let b = binding("x", "cxt:x query:x", Some(Value::from("ABSENT")));

        let params = bind_params(&step(vec![b]), &Scope { cxt: &cxt, request: &request });
        assert_eq!(params.get_string("x", "").unwrap(), "fromquery");
        assert_eq!(
            params.origin("x"),
            Some(&ParamOrigin::Source(Source::Query("x".to_string())))
        );
    }

    #[test]
    fn test_null_everywhere_falls_back_to_default() {
        let mut cxt = Context::new();
        cxt.add("x", Value::Null);
        let request = Request::new("GET /");
        let b = binding("x", "cxt:x", Some(Value::from("ABSENT")));

        let params = bind_params(&step(vec![b]), &Scope { cxt: &cxt, request: &request });
        assert_eq!(params.get_string("x", "").unwrap(), "ABSENT");
        assert_eq!(params.origin("x"), Some(&ParamOrigin::Default));
    }

    #[test]
    fn test_named_key_value_datasource() {
        let cxt = Context::new();
        cxt.add_key_value_datasource("settings", Arc::new(MapDatasource::new().with("theme", "dark")));
        let request = Request::new("GET /");
        let b = binding("theme", "settings:theme", None);

        let params = bind_params(&step(vec![b]), &Scope { cxt: &cxt, request: &request });
        assert_eq!(params.get_string("theme", "").unwrap(), "dark");
    }

    #[test]
    fn test_unknown_datasource_is_a_miss() {
        let cxt = Context::new();
        let request = Request::new("GET /");
        let b = binding("x", "nowhere:x", Some(Value::from(1isize)));

        let params = bind_params(&step(vec![b]), &Scope { cxt: &cxt, request: &request });
        assert_eq!(params.get_int("x", 0).unwrap(), 1);
    }
}
