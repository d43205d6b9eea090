//! The keyword-dispatched scan. Every handler advances the cursor by at
//! least one token, so the scan terminates on any finite stream.

use tokens::number::number_value;
use tokens::SyntaxKind;

use crate::parser::Parser;
use crate::{ParseObserver, PortDirection};

pub(crate) fn source_file(p: &mut Parser, obs: &mut dyn ParseObserver) {
    let mut in_module = false;
    while !p.at(SyntaxKind::Eof) {
        let kind = p.current().kind;
        match kind {
            SyntaxKind::Keyword => keyword(p, obs, &mut in_module),
            SyntaxKind::Directive => {
                let token = p.current();
                obs.directive(token.lexeme.trim_start_matches('`'), token.line, token.column);
                p.bump();
            }
            SyntaxKind::Ident => identifier(p, obs, in_module),
            _ => p.bump(),
        }
    }
}

fn keyword(p: &mut Parser, obs: &mut dyn ParseObserver, in_module: &mut bool) {
    let line = p.current().line;
    let keyword = p.current().lexeme.clone();
    match keyword.as_str() {
        "module" => {
            *in_module = true;
            module_decl(p, obs);
        }
        "endmodule" => {
            *in_module = false;
            obs.module_end();
            p.bump();
        }
        "input" => port_decl(p, obs, PortDirection::Input),
        "output" => port_decl(p, obs, PortDirection::Output),
        "inout" => port_decl(p, obs, PortDirection::Inout),
        "wire" | "reg" => net_decl(p, obs),
        "parameter" => parameter_decl(p, obs),
        "always" => {
            obs.always_begin(line);
            p.bump();
        }
        "assign" => {
            obs.assign(line);
            p.bump();
        }
        _ => p.bump(),
    }
}

fn module_decl(p: &mut Parser, obs: &mut dyn ParseObserver) {
    p.bump();
    skip_to_ident(p, obs, false);
    if p.at(SyntaxKind::Ident) {
        let token = p.current();
        obs.module_begin(&token.lexeme, token.line);
        p.bump();
    }
}

fn port_decl(p: &mut Parser, obs: &mut dyn ParseObserver, direction: PortDirection) {
    let line = p.current().line;
    p.bump();
    skip_to_ident(p, obs, true);
    if p.at(SyntaxKind::Ident) {
        let name = p.current().lexeme.clone();
        obs.port_declaration(direction, &name, line);
        p.bump();
    }
}

fn net_decl(p: &mut Parser, obs: &mut dyn ParseObserver) {
    let kind = p.current().lexeme.clone();
    let line = p.current().line;
    p.bump();
    skip_to_ident(p, obs, true);
    if p.at(SyntaxKind::Ident) {
        let name = p.current().lexeme.clone();
        obs.net_declaration(&kind, &name, line);
        p.bump();
    }
}

fn parameter_decl(p: &mut Parser, obs: &mut dyn ParseObserver) {
    p.bump();
    skip_to_ident(p, obs, false);
    if !p.at(SyntaxKind::Ident) {
        return;
    }
    let token = p.current();
    obs.parameter_declaration(&token.lexeme.clone(), token.line);
    p.bump();

    if p.at_operator("=") {
        p.bump();
        if matches!(p.current().kind, SyntaxKind::Number | SyntaxKind::Ident | SyntaxKind::String) {
            obs.parameter_value(&p.current().lexeme.clone());
            p.bump();
        }
    }
}

/// Advance to the next identifier (the declared name). With `widths`, a
/// `[msb:lsb]` range of plain decimals passed over on the way is reported
/// as a width hint.
fn skip_to_ident(p: &mut Parser, obs: &mut dyn ParseObserver, widths: bool) {
    while !p.at(SyntaxKind::Ident) && !p.at(SyntaxKind::Eof) {
        if widths
            && p.at_delimiter("[")
            && p.nth(1).kind == SyntaxKind::Number
            && p.nth_at_delimiter(2, ":")
            && p.nth(3).kind == SyntaxKind::Number
            && p.nth_at_delimiter(4, "]")
        {
            let msb = number_value(&p.nth(1).lexeme);
            let lsb = number_value(&p.nth(3).lexeme);
            if let (Some(msb), Some(lsb)) = (msb, lsb) {
                obs.width_hint((msb - lsb).unsigned_abs() as u32 + 1);
            }
            for _ in 0..5 {
                p.bump();
            }
            continue;
        }
        p.bump();
    }
}

fn identifier(p: &mut Parser, obs: &mut dyn ParseObserver, in_module: bool) {
    let token = p.current();
    obs.identifier(&token.lexeme, token.line, token.column);

    // `Ident Ident (` at module scope begins an instantiation
    if in_module && p.nth(1).kind == SyntaxKind::Ident && p.nth_at_delimiter(2, "(") {
        instance(p, obs);
    } else {
        p.bump();
    }
}

fn instance(p: &mut Parser, obs: &mut dyn ParseObserver) {
    let module = p.current().lexeme.clone();
    p.bump();
    let name = p.current().lexeme.clone();
    let line = p.current().line;
    obs.instance(&module, &name, line);
    p.bump();
    p.bump(); // (

    let mut positional = 0u32;
    while !p.at(SyntaxKind::Eof) {
        if p.eat_delimiter(")") {
            break;
        }
        if p.eat_delimiter(".") {
            if p.at(SyntaxKind::Ident) {
                named_connection(p, obs);
            }
            continue;
        }
        if matches!(p.current().kind, SyntaxKind::Ident | SyntaxKind::Number) {
            positional += 1;
            let net = p.current().lexeme.clone();
            obs.pin_connection(&format!("pin{positional}"), Some(&net));
            p.bump();
            continue;
        }
        p.bump();
    }
    p.eat_delimiter(";");
}

/// `.pin(net)`; the pin may be left unconnected (`.pin()`).
fn named_connection(p: &mut Parser, obs: &mut dyn ParseObserver) {
    let pin = p.current().lexeme.clone();
    p.bump();
    let mut net = None;
    if p.eat_delimiter("(") {
        if matches!(p.current().kind, SyntaxKind::Ident | SyntaxKind::Number) {
            net = Some(p.current().lexeme.clone());
            p.bump();
        }
        while !p.at(SyntaxKind::Eof) && !p.at_delimiter(")") && !p.at_delimiter(",") {
            p.bump();
        }
        p.eat_delimiter(")");
    }
    obs.pin_connection(&pin, net.as_deref());
}
