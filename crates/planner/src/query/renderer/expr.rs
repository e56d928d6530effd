use crate::query::{
    ast::expr::{BinaryOp, BinaryOperator, Expr, Ident},
    renderer::{Render, Renderer},
};

impl Render for Expr {
    fn render(&self, r: &mut Renderer) {
        match self {
            Expr::Identifier(ident) => ident.render(r),
            Expr::Value(val) => r.push_literal(val),
            Expr::BinaryOp(op) => op.render(r),
            Expr::IsNull { expr, negated } => {
                r.sql.push('(');
                expr.render(r);
                r.sql
                    .push_str(if *negated { " IS NOT NULL)" } else { " IS NULL)" });
            }
            Expr::Alias { expr, alias } => {
                expr.render(r);
                r.sql.push_str(" AS ");
                r.push_identifier(alias);
            }
            Expr::Raw(sql) => {
                r.sql.push('(');
                r.sql.push_str(sql);
                r.sql.push(')');
            }
        }
    }
}

impl Render for Ident {
    fn render(&self, r: &mut Renderer) {
        if let Some(qualifier) = &self.qualifier {
            r.push_identifier(qualifier);
            r.sql.push('.');
        }
        r.push_identifier(&self.name);
    }
}

impl Render for BinaryOp {
    fn render(&self, r: &mut Renderer) {
        r.sql.push('(');
        self.left.render(r);

        let op_str = match self.op {
            BinaryOperator::Eq => " = ",
            BinaryOperator::NotEq => " != ",
            BinaryOperator::Lt => " < ",
            BinaryOperator::LtEq => " <= ",
            BinaryOperator::Gt => " > ",
            BinaryOperator::GtEq => " >= ",
            BinaryOperator::Glob => " GLOB ",
            BinaryOperator::And => " AND ",
            BinaryOperator::Or => " OR ",
        };
        r.sql.push_str(op_str);

        self.right.render(r);
        r.sql.push(')');
    }
}
