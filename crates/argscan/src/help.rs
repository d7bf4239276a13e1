//! Usage and help rendering, derived purely from the parameter list.

use crate::param::Param;
use crate::value;

fn format_flag(flag: &str) -> String {
    if flag.chars().count() > 1 {
        format!("--{flag}")
    } else {
        format!("-{flag}")
    }
}

/// Usage of one parameter: its flags joined by `|`, then the value
/// placeholder. A custom usage string replaces all of it.
pub fn param_usage(param: &Param) -> String {
    if let Some(usage) = param.usage() {
        return usage.to_string();
    }
    let mut out = String::new();
    if param.is_flagged() {
        let flags: Vec<String> = param.flags().iter().map(|f| format_flag(f)).collect();
        out.push_str(&flags.join("|"));
        if param.optional_value() {
            out.push_str(&format!("(:{})", param.name()));
        }
    }
    if !param.is_switch() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(&format!("<{}>", param.name()));
        if param.greedy() {
            out.push_str("...");
        }
    }
    out
}

pub fn usage(params: &[Param]) -> String {
    params
        .iter()
        .map(|p| {
            if p.required() {
                param_usage(p)
            } else {
                format!("[{}]", param_usage(p))
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn help(params: &[Param]) -> String {
    let blocks: Vec<String> = params
        .iter()
        .map(|p| {
            let mut out = param_usage(p);
            out.push('\n');
            if let Some(help) = p.help() {
                out.push_str(&format!("  {help}\n"));
            }
            if !p.default_value().is_null() && !p.is_switch() {
                out.push_str(&format!("  (default: {})\n", value::display(p.default_value())));
            }
            out
        })
        .collect();
    blocks.join("\n")
}

pub fn help_text(params: &[Param]) -> String {
    format!("{}\n\n{}", usage(params), help(params))
}
