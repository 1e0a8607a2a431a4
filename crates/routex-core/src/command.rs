//! The operation contract
//!
//! A command reads through the context and its step's [`Params`], and
//! returns an [`Outcome`]. It must not keep the `Params` beyond the call.

use crate::context::Context;
use crate::params::Params;
use crate::signal::Outcome;

/// An operation invoked by a route step
pub trait Command: Send + Sync {
    fn execute(&self, cxt: &mut Context, params: &Params) -> Outcome;

    /// Name used in logs and errors
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

impl<F> Command for F
where
    F: Fn(&mut Context, &Params) -> Outcome + Send + Sync,
{
    fn execute(&self, cxt: &mut Context, params: &Params) -> Outcome {
        self(cxt, params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::getter::GetterExt;

    struct Upper;

    impl Command for Upper {
        fn execute(&self, _cxt: &mut Context, params: &Params) -> Outcome {
            match params.get_string("text", "") {
                Ok(text) => Outcome::ok(text.to_uppercase()),
                Err(err) => Outcome::fatal(err.into()),
            }
        }

        fn name(&self) -> &str {
            "upper"
        }
    }

    #[test]
    fn test_struct_command() {
        let mut cxt = Context::new();
        let params = Params::from_pairs([("text", "abc")]);
        let outcome = Upper.execute(&mut cxt, &params);
        assert_eq!(outcome.value, Some("ABC".into()));
        assert_eq!(Upper.name(), "upper");
    }

    #[test]
    fn test_closure_command() {
        let cmd = |cxt: &mut Context, _: &Params| {
            cxt.add("touched", true);
            Outcome::done()
        };
        let mut cxt = Context::new();
        cmd.execute(&mut cxt, &Params::new());
        assert_eq!(cxt.has("touched"), Some(true.into()));
    }
}
