//! The textual dump format used for snapshot tests and operator diagnostics.
//! Not a parseable format — optimized for readability.
//!
//! Every renderer needs the parent `Function` to resolve ids into names, so
//! each piece of IR is paired with it through the `Dump` wrapper before
//! being handed to `Display`.

use std::fmt;

use tiro_util::index_vec::Idx;

use crate::entities::Record;
use crate::function::Function;
use crate::ids::{BlockId, LocalId, LocalListId, PhiId, RecordId};
use crate::rpo::ReversePostorderTraversal;
use crate::stmt::Stmt;
use crate::terminator::{BranchType, Terminator};
use crate::value::{
    Aggregate, AggregateMember, BinaryOp, Constant, ContainerType, LValue, RValue, UnaryOp,
};

/// Pairs a piece of IR with the function it belongs to so `Display` can
/// resolve the ids it contains.
pub struct Dump<'a, T>(&'a Function, T);

pub fn dump<T>(func: &Function, value: T) -> Dump<'_, T> {
    Dump(func, value)
}

/// Renders the full function: header, then each reachable block in
/// reverse postorder, blank-line separated.
pub fn dump_function(func: &Function) -> String {
    use fmt::Write;
    let mut out = String::new();
    writeln!(out, "Function").unwrap();
    writeln!(out, "  Name: {}", func.name().as_str()).unwrap();
    writeln!(out, "  Type: {:?}", func.kind()).unwrap();
    out.push('\n');

    let rpo = ReversePostorderTraversal::new(func);
    for block_id in rpo.iter() {
        if block_id != func.entry() {
            out.push('\n');
        }
        let block = func.block(block_id);
        writeln!(
            out,
            "{} (sealed: {}, filled: {})",
            dump(func, block_id),
            block.sealed(),
            block.filled()
        )
        .unwrap();

        if block.predecessor_count() > 0 {
            out.push_str("  <- ");
            for (index, &pred) in block.predecessors().iter().enumerate() {
                if index != 0 {
                    out.push_str(", ");
                }
                write!(out, "{}", dump(func, pred)).unwrap();
            }
            out.push('\n');
        }

        let stmt_count = block.stmt_count();
        let width = if stmt_count == 0 {
            1
        } else {
            (stmt_count - 1).to_string().len()
        };
        for (index, stmt) in block.stmts().iter().enumerate() {
            writeln!(out, "  {index:>width$}: {}", dump(func, *stmt)).unwrap();
        }
        writeln!(out, "  {}", dump(func, block.terminator().clone())).unwrap();
    }
    out
}

impl fmt::Display for Dump<'_, BlockId> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Dump(func, block_id) = *self;
        if block_id.is_invalid() {
            return write!(f, "<INVALID>");
        }
        match func.block(block_id).label() {
            Some(label) => write!(f, "${}-{}", block_id.index(), label.as_str()),
            None => write!(f, "${}", block_id.index()),
        }
    }
}

impl fmt::Display for Dump<'_, LocalId> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Dump(func, local_id) = *self;
        if local_id.is_invalid() {
            return write!(f, "<INVALID>");
        }
        match func.local(local_id).name() {
            Some(name) => write!(f, "%{}_{}", name.as_str(), local_id.index()),
            None => write!(f, "%{}", local_id.index()),
        }
    }
}

impl fmt::Display for Dump<'_, PhiId> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Dump(func, phi_id) = *self;
        if phi_id.is_invalid() {
            return write!(f, "<INVALID>");
        }
        let phi = func.phi(phi_id);
        if phi.operand_count() == 0 {
            return write!(f, "<phi>");
        }
        write!(f, "<phi")?;
        for &operand in phi.operands() {
            write!(f, " {}", dump(func, operand))?;
        }
        write!(f, ">")
    }
}

impl fmt::Display for Dump<'_, LocalListId> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Dump(func, list_id) = *self;
        if list_id.is_invalid() {
            return write!(f, "<INVALID>");
        }
        for (index, &local) in func.local_list(list_id).as_slice().iter().enumerate() {
            if index != 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", dump(func, local))?;
        }
        Ok(())
    }
}

impl fmt::Display for Dump<'_, RecordId> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Dump(func, record_id) = *self;
        if record_id.is_invalid() {
            return write!(f, "<INVALID>");
        }
        write!(f, "<record")?;
        for (index, &(name, value)) in record_entries(func, record_id).iter().enumerate() {
            if index != 0 {
                write!(f, ",")?;
            }
            write!(f, " {}: {}", name.as_str(), dump(func, value))?;
        }
        write!(f, ">")
    }
}

fn record_entries(func: &Function, id: RecordId) -> &[(tiro_util::Symbol, LocalId)] {
    let record: &Record = func.record(id);
    record.entries()
}

impl fmt::Display for Dump<'_, LValue> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Dump(func, lvalue) = *self;
        match lvalue {
            LValue::Param(id) => write!(f, "<param {}>", id.index()),
            LValue::Closure { env, levels, index } => {
                write!(f, "<closure {} level: {levels} index: {index}>", dump(func, env))
            }
            LValue::Module(id) => write!(f, "<module {}>", id.index()),
            LValue::Field { object, name } => write!(f, "{}.{}", dump(func, object), name.as_str()),
            LValue::TupleField { object, index } => write!(f, "{}.{index}", dump(func, object)),
            LValue::Index { object, index } => {
                write!(f, "{}[{}]", dump(func, object), dump(func, index))
            }
        }
    }
}

impl fmt::Display for BranchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            BranchType::IfTrue => "IfTrue",
            BranchType::IfFalse => "IfFalse",
            BranchType::IfNull => "IfNull",
            BranchType::IfNotNull => "IfNotNull",
        };
        write!(f, "{text}")
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            BinaryOp::Plus => "+",
            BinaryOp::Minus => "-",
            BinaryOp::Multiply => "*",
            BinaryOp::Divide => "/",
            BinaryOp::Modulus => "mod",
            BinaryOp::Power => "pow",
            BinaryOp::LeftShift => "lsh",
            BinaryOp::RightShift => "rsh",
            BinaryOp::BitwiseAnd => "band",
            BinaryOp::BitwiseOr => "bor",
            BinaryOp::BitwiseXor => "bxor",
            BinaryOp::Less => "lt",
            BinaryOp::LessEquals => "lte",
            BinaryOp::Greater => "gt",
            BinaryOp::GreaterEquals => "gte",
            BinaryOp::Equals => "eq",
            BinaryOp::NotEquals => "neq",
        };
        write!(f, "{text}")
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            UnaryOp::Plus => "+",
            UnaryOp::Minus => "-",
            UnaryOp::BitwiseNot => "bnot",
            UnaryOp::LogicalNot => "lnot",
        };
        write!(f, "{text}")
    }
}

impl fmt::Display for ContainerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ContainerType::Array => "Array",
            ContainerType::Tuple => "Tuple",
            ContainerType::Set => "Set",
            ContainerType::Map => "Map",
        };
        write!(f, "{text}")
    }
}

impl fmt::Display for AggregateMember {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            AggregateMember::MethodInstance => "instance",
            AggregateMember::MethodFunction => "function",
            AggregateMember::IteratorNextValid => "valid",
            AggregateMember::IteratorNextValue => "value",
        };
        write!(f, "{text}")
    }
}

impl fmt::Display for Dump<'_, Constant> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Dump(_func, constant) = self;
        match constant {
            Constant::Integer(v) => write!(f, "{v}"),
            Constant::Float(v) => format_float(v.0, f),
            Constant::String(s) => write!(f, "\"{}\"", escape_string(s.as_str())),
            Constant::Symbol(s) => write!(f, "#{}", escape_string(s.as_str())),
            Constant::Null => write!(f, "null"),
            Constant::True => write!(f, "true"),
            Constant::False => write!(f, "false"),
        }
    }
}

fn format_float(v: f64, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if v.is_nan() {
        write!(f, "nan")
    } else if v.is_infinite() {
        write!(f, "{}inf", if v < 0.0 { "-" } else { "" })
    } else if v.fract() == 0.0 {
        write!(f, "{v:.1}")
    } else {
        write!(f, "{v}")
    }
}

/// C-style escaping of control characters, backslash and double quote.
fn escape_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c if c.is_control() => out.push_str(&format!("\\x{:02x}", c as u32)),
            c => out.push(c),
        }
    }
    out
}

impl fmt::Display for Dump<'_, Aggregate> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Dump(func, aggregate) = *self;
        match aggregate {
            Aggregate::Method { instance, function } => {
                write!(f, "<method {}.{}>", dump(func, instance), function.as_str())
            }
            Aggregate::IteratorNext { iterator } => {
                write!(f, "<iterator-next {}>", dump(func, iterator))
            }
        }
    }
}

impl fmt::Display for Dump<'_, RValue> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Dump(func, rvalue) = *self;
        match rvalue {
            RValue::UseLValue(lvalue) => write!(f, "{}", dump(func, lvalue)),
            RValue::UseLocal(local) => write!(f, "{}", dump(func, local)),
            RValue::Phi(phi_id) => write!(f, "{}", dump(func, phi_id)),
            RValue::Phi0 => write!(f, "<phi>"),
            RValue::Constant(constant) => write!(f, "{}", dump(func, constant)),
            RValue::OuterEnvironment => write!(f, "<outer-env>"),
            RValue::BinaryOp(op, left, right) => {
                write!(f, "{} {op} {}", dump(func, left), dump(func, right))
            }
            RValue::UnaryOp(op, operand) => write!(f, "{op} {}", dump(func, operand)),
            RValue::Call { func: callee, args } => {
                write!(f, "{}({})", dump(func, callee), dump(func, args))
            }
            RValue::Aggregate(aggregate) => write!(f, "{}", dump(func, aggregate)),
            RValue::GetAggregateMember { aggregate, member } => {
                write!(f, "<get-aggregate-member {} {member}>", dump(func, aggregate))
            }
            RValue::MethodCall { method, args } => {
                write!(f, "{}({})", dump(func, method), dump(func, args))
            }
            RValue::MakeEnvironment { parent, size } => {
                write!(f, "<make-env {} {size}>", dump(func, parent))
            }
            RValue::MakeClosure { env, func: closure_fn } => {
                write!(f, "<make-closure env: {} func: {}>", dump(func, env), dump(func, closure_fn))
            }
            RValue::MakeIterator { container } => {
                write!(f, "<make-iterator container: {}>", dump(func, container))
            }
            RValue::Record(record_id) => write!(f, "{}", dump(func, record_id)),
            RValue::Container(kind, args) => write!(f, "{kind}({})", dump(func, args)),
            RValue::Format(args) => write!(f, "<format {}>", dump(func, args)),
            RValue::Error => write!(f, "<error>"),
        }
    }
}

impl fmt::Display for Dump<'_, Stmt> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Dump(func, stmt) = *self;
        match stmt {
            Stmt::Assign { target, value } => {
                write!(f, "{} = {}", dump(func, target), dump(func, value))
            }
            Stmt::Define { local } => {
                if local.is_invalid() {
                    return write!(f, "<INVALID>");
                }
                write!(f, "{} = {}", dump(func, local), dump(func, func.local(local).value()))
            }
        }
    }
}

impl fmt::Display for Dump<'_, Terminator> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Dump(func, terminator) = *self;
        match terminator {
            Terminator::None => write!(f, "-> none"),
            Terminator::Jump { target } => write!(f, "-> jump {}", dump(func, target)),
            Terminator::Branch {
                kind,
                value,
                target,
                fallthrough,
            } => write!(
                f,
                "-> branch {kind} {} target: {} fallthrough: {}",
                dump(func, value),
                dump(func, target),
                dump(func, fallthrough)
            ),
            Terminator::Return { value, .. } => {
                write!(f, "-> return {} target: $exit", dump(func, value))
            }
            Terminator::Exit => write!(f, "-> exit"),
            Terminator::AssertFail { expr, message, .. } => write!(
                f,
                "-> assert fail expr: {} message: {} target: $exit",
                dump(func, expr),
                dump(func, message)
            ),
            Terminator::Never { .. } => write!(f, "-> never $exit"),
        }
    }
}
