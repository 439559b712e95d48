//! Formatted terminal output.
//!
//! We keep formatting code in one place so the model code stays free of
//! presentation details and output changes are localized.

use crate::report::YieldRow;
use crate::workspace::{Node, Workspace};

/// Summary of a workspace: variables, functions and sets, in declaration order.
pub fn format_workspace(ws: &Workspace) -> String {
    let mut out = String::new();

    out.push_str(&format!("=== workspace '{}' ({} nodes) ===\n", ws.name(), ws.len()));

    out.push_str("\nVariables:\n");
    for (name, node) in ws.entries() {
        if let Node::Var(v) = node {
            if v.constant {
                out.push_str(&format!("  {name:<16} = {:<10} C\n", fmt_num(v.value)));
            } else {
                out.push_str(&format!(
                    "  {name:<16} = {:<10} [{}, {}]\n",
                    fmt_num(v.value),
                    fmt_num(v.min),
                    fmt_num(v.max)
                ));
            }
        }
    }

    out.push_str("\nFunctions:\n");
    for (name, node) in ws.entries() {
        if let Node::Func(f) = node {
            out.push_str(&format!("  {name:<28} := {}\n", f.expr));
        }
    }

    let mut sets = ws.sets().peekable();
    if sets.peek().is_some() {
        out.push_str("\nSets:\n");
        for (name, members) in sets {
            out.push_str(&format!("  {name} = ({})\n", members.join(",")));
        }
    }

    out
}

/// Production × decay table of yield scales.
pub fn format_yield_table(rows: &[YieldRow]) -> String {
    let mut out = String::new();
    out.push_str(&format!("{:<10} {:<10} {:>12}  {}\n", "production", "decay", "scale", "expression"));
    for r in rows {
        out.push_str(&format!(
            "{:<10} {:<10} {:>12.6}  {}\n",
            r.production, r.decay, r.value, r.name
        ));
    }
    out
}

fn fmt_num(v: f64) -> String {
    let s = format!("{v:.6}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s.is_empty() || s == "-" { "0".to_string() } else { s.to_string() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workspace::{Expr, Function, RealVar};

    #[test]
    fn workspace_summary_lists_everything() {
        let mut ws = Workspace::new("test");
        ws.declare_var("CF", RealVar::ranged(1.0, -2.0, 2.0)).unwrap();
        ws.declare_var("MH", RealVar::constant(125.0)).unwrap();
        ws.declare_function("cf2", Function::new("", Expr::square("CF"))).unwrap();
        ws.define_set("POI", &["CF"]).unwrap();

        let text = format_workspace(&ws);
        assert!(text.contains("workspace 'test' (3 nodes)"));
        assert!(text.contains("CF               = 1          [-2, 2]"));
        assert!(text.contains("MH               = 125        C"));
        assert!(text.contains(":= (CF * CF)"));
        assert!(text.contains("POI = (CF)"));
    }

    #[test]
    fn numbers_are_trimmed() {
        assert_eq!(fmt_num(1.5), "1.5");
        assert_eq!(fmt_num(-4.0), "-4");
        assert_eq!(fmt_num(0.0), "0");
    }
}
