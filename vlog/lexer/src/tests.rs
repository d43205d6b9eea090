use expect_test::{expect, Expect};
use text_size::{TextRange, TextSize};
use tokens::LanguageStandard;

use crate::{lex, tokenize};

fn check_lexing(src: &str, expect: Expect) {
    let mut offset = TextSize::from(0);
    let actual: String = tokenize(src)
        .into_iter()
        .map(|token| {
            let content = &src[TextRange::at(offset, token.len)];
            offset += token.len;
            format!("{:?}\n{:?}\n", token, content)
        })
        .collect();
    expect.assert_eq(&actual)
}

fn check_full(src: &str, expect: Expect) {
    let actual: String = lex(src, LanguageStandard::Verilog2001)
        .into_iter()
        .map(|token| {
            format!("{} {:?} @ {}:{}\n", token.kind, token.lexeme, token.line, token.column)
        })
        .collect();
    expect.assert_eq(&actual)
}

#[test]
fn smoke_test() {
    check_lexing(
        "module top; // the top\nendmodule\n",
        expect![[r#"
            Token { kind: SimpleIdent, len: 6 }
            "module"
            Token { kind: Whitespace, len: 1 }
            " "
            Token { kind: SimpleIdent, len: 3 }
            "top"
            Token { kind: Delimiter, len: 1 }
            ";"
            Token { kind: Whitespace, len: 1 }
            " "
            Token { kind: LineComment, len: 10 }
            "// the top"
            Token { kind: Newline, len: 1 }
            "\n"
            Token { kind: SimpleIdent, len: 9 }
            "endmodule"
            Token { kind: Newline, len: 1 }
            "\n"
        "#]],
    )
}

#[test]
fn comment_flavors() {
    check_lexing(
        "// line\n/* block */ /* multi\nline */ /* open",
        expect![[r#"
            Token { kind: LineComment, len: 7 }
            "// line"
            Token { kind: Newline, len: 1 }
            "\n"
            Token { kind: BlockComment { terminated: true }, len: 11 }
            "/* block */"
            Token { kind: Whitespace, len: 1 }
            " "
            Token { kind: BlockComment { terminated: true }, len: 16 }
            "/* multi\nline */"
            Token { kind: Whitespace, len: 1 }
            " "
            Token { kind: BlockComment { terminated: false }, len: 7 }
            "/* open"
        "#]],
    )
}

#[test]
fn numbers() {
    check_lexing(
        "4'b1111 32'sh1b 8'b1010_1010 42 16'hdead",
        expect![[r#"
            Token { kind: Literal { kind: SizedInt }, len: 7 }
            "4'b1111"
            Token { kind: Whitespace, len: 1 }
            " "
            Token { kind: Literal { kind: SizedInt }, len: 7 }
            "32'sh1b"
            Token { kind: Whitespace, len: 1 }
            " "
            Token { kind: Literal { kind: SizedInt }, len: 12 }
            "8'b1010_1010"
            Token { kind: Whitespace, len: 1 }
            " "
            Token { kind: Literal { kind: Int }, len: 2 }
            "42"
            Token { kind: Whitespace, len: 1 }
            " "
            Token { kind: Literal { kind: SizedInt }, len: 8 }
            "16'hdead"
        "#]],
    )
}

#[test]
fn operators_and_delimiters() {
    check_lexing(
        "assign y = a <= b ? ~c : d;",
        expect![[r#"
            Token { kind: SimpleIdent, len: 6 }
            "assign"
            Token { kind: Whitespace, len: 1 }
            " "
            Token { kind: SimpleIdent, len: 1 }
            "y"
            Token { kind: Whitespace, len: 1 }
            " "
            Token { kind: Operator, len: 1 }
            "="
            Token { kind: Whitespace, len: 1 }
            " "
            Token { kind: SimpleIdent, len: 1 }
            "a"
            Token { kind: Whitespace, len: 1 }
            " "
            Token { kind: Operator, len: 2 }
            "<="
            Token { kind: Whitespace, len: 1 }
            " "
            Token { kind: SimpleIdent, len: 1 }
            "b"
            Token { kind: Whitespace, len: 1 }
            " "
            Token { kind: Unknown, len: 1 }
            "?"
            Token { kind: Whitespace, len: 1 }
            " "
            Token { kind: Operator, len: 1 }
            "~"
            Token { kind: SimpleIdent, len: 1 }
            "c"
            Token { kind: Whitespace, len: 1 }
            " "
            Token { kind: Delimiter, len: 1 }
            ":"
            Token { kind: Whitespace, len: 1 }
            " "
            Token { kind: SimpleIdent, len: 1 }
            "d"
            Token { kind: Delimiter, len: 1 }
            ";"
        "#]],
    )
}

#[test]
fn directives_and_strings() {
    check_lexing(
        "`timescale 1ns \"a string\" `define",
        expect![[r#"
            Token { kind: CompilerDirective, len: 10 }
            "`timescale"
            Token { kind: Whitespace, len: 1 }
            " "
            Token { kind: Literal { kind: Int }, len: 1 }
            "1"
            Token { kind: SimpleIdent, len: 2 }
            "ns"
            Token { kind: Whitespace, len: 1 }
            " "
            Token { kind: Literal { kind: Str { terminated: true } }, len: 10 }
            "\"a string\""
            Token { kind: Whitespace, len: 1 }
            " "
            Token { kind: CompilerDirective, len: 7 }
            "`define"
        "#]],
    )
}

#[test]
fn positions_and_keywords() {
    check_full(
        "module top;\n  wire w;\nendmodule\n",
        expect![[r#"
            keyword "module" @ 1:1
            identifier "top" @ 1:8
            delimiter ";" @ 1:11
            keyword "wire" @ 2:3
            identifier "w" @ 2:8
            delimiter ";" @ 2:9
            keyword "endmodule" @ 3:1
            end of input "" @ 4:1
        "#]],
    )
}

#[test]
fn keyword_set_follows_standard() {
    let sv = lex("logic l;", LanguageStandard::SystemVerilog2017);
    assert_eq!(sv[0].kind, tokens::SyntaxKind::Keyword);
    let v95 = lex("logic l;", LanguageStandard::Verilog1995);
    assert_eq!(v95[0].kind, tokens::SyntaxKind::Ident);
}

#[test]
fn single_eof_token() {
    for src in ["", "module", "a b c\n", "@#!%"] {
        let toks = lex(src, LanguageStandard::default());
        let eofs = toks.iter().filter(|t| t.kind == tokens::SyntaxKind::Eof).count();
        assert_eq!(eofs, 1);
        assert_eq!(toks.last().unwrap().kind, tokens::SyntaxKind::Eof);
    }
}

#[test]
fn raw_tokens_cover_every_byte() {
    let src = "module m; wire?w; /*x*/ 4'bz1 \"s\n";
    let total: u32 = tokenize(src).iter().map(|t| u32::from(t.len)).sum();
    assert_eq!(total as usize, src.len());
}
