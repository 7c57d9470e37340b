/// Abstract syntax tree nodes for the Goose language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    // 32-bit integer literal
    Number(i32),
    // reference to a global declared earlier
    Var(String),
    // parsed but never lowered
    Str(String),
    Binary {
        left: Box<Expr>,
        op: BinOp,
        right: Box<Expr>,
    },
}

impl Expr {
    pub fn binary(left: Expr, op: BinOp, right: Expr) -> Self {
        Expr::Binary {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
}

/// The single top-level statement of a Goose program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
    /// `name = value`, binding a global.
    Assign { name: String, value: Expr },
    /// A bare expression; evaluated for its instructions, result dropped.
    Expr(Expr),
}
