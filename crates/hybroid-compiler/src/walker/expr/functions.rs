//! Anonymous functions and the body walk shared by every function form.

use hybroid_ast::{FunctionExpr, Param, Stmt};
use hybroid_core::{AlertKind, Span};

use super::Walker;
use crate::exits::ExitFlags;
use crate::scope::FuncTag;
use crate::values::{FunctionVal, Value, VariableVal, to_value};

impl<'s> Walker<'s> {
    /// `fn(params) -> returns { body }`
    pub(crate) fn walk_function_expr(&mut self, function: &mut FunctionExpr) -> Value {
        let sig = self.resolve_signature(&[], &function.params, &function.returns);
        self.walk_function_body(&sig, &function.params, &mut function.body, function.span);
        Value::Function(sig)
    }

    /// Walk a function body in its own scope with the parameters bound.
    ///
    /// A function that declares returns must return on every path.
    pub(crate) fn walk_function_body(
        &mut self,
        sig: &FunctionVal,
        params: &[Param],
        body: &mut Vec<Stmt>,
        span: Span,
    ) {
        self.scopes_mut().push_function(FuncTag {
            generics: sig.generics.clone(),
            returns: sig.returns.clone(),
        });
        for (param, ty) in params.iter().zip(&sig.params) {
            let variable = VariableVal::new(param.name.as_str(), to_value(ty), param.name.span)
                .initialized(true);
            self.declare(variable, "parameter");
        }

        self.walk_body(body);

        let exits = self.scopes().current().exits;
        if !sig.returns.is_empty() && !exits.contains(ExitFlags::RETURN) {
            self.report(AlertKind::NotAllCodePathsExit { exit: "return" }, span);
        }
        self.scopes_mut().close();
    }
}
