//! Reserved-word tables, cumulative per language standard.
//! Compile-time sorted slices, queried by binary search.

/// The language standard whose keyword set is active, by IEEE designation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum LanguageStandard {
    Verilog1995,
    #[default]
    Verilog2001,
    Verilog2005,
    SystemVerilog2005,
    SystemVerilog2009,
    SystemVerilog2012,
    SystemVerilog2017,
    SystemVerilog2023,
}

impl LanguageStandard {
    pub fn from_ieee(designation: &str) -> Option<LanguageStandard> {
        let standard = match designation {
            "1364-1995" => LanguageStandard::Verilog1995,
            "1364-2001" => LanguageStandard::Verilog2001,
            "1364-2005" => LanguageStandard::Verilog2005,
            "1800-2005" => LanguageStandard::SystemVerilog2005,
            "1800-2009" => LanguageStandard::SystemVerilog2009,
            "1800-2012" => LanguageStandard::SystemVerilog2012,
            "1800-2017" => LanguageStandard::SystemVerilog2017,
            "1800-2023" => LanguageStandard::SystemVerilog2023,
            _ => return None,
        };
        Some(standard)
    }

    pub fn ieee(self) -> &'static str {
        match self {
            LanguageStandard::Verilog1995 => "1364-1995",
            LanguageStandard::Verilog2001 => "1364-2001",
            LanguageStandard::Verilog2005 => "1364-2005",
            LanguageStandard::SystemVerilog2005 => "1800-2005",
            LanguageStandard::SystemVerilog2009 => "1800-2009",
            LanguageStandard::SystemVerilog2012 => "1800-2012",
            LanguageStandard::SystemVerilog2017 => "1800-2017",
            LanguageStandard::SystemVerilog2023 => "1800-2023",
        }
    }

    /// Number of keyword tiers active under this standard.
    fn tiers(self) -> usize {
        match self {
            LanguageStandard::Verilog1995 => 1,
            LanguageStandard::Verilog2001 => 2,
            LanguageStandard::Verilog2005 => 3,
            LanguageStandard::SystemVerilog2005 => 4,
            LanguageStandard::SystemVerilog2009 => 5,
            // 1800-2017 and 1800-2023 added no new reserved words
            LanguageStandard::SystemVerilog2012
            | LanguageStandard::SystemVerilog2017
            | LanguageStandard::SystemVerilog2023 => 6,
        }
    }
}

impl std::fmt::Display for LanguageStandard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.ieee())
    }
}

pub fn is_keyword(word: &str, standard: LanguageStandard) -> bool {
    TIERS[..standard.tiers()].iter().any(|tier| tier.binary_search(&word).is_ok())
}

const TIERS: &[&[&str]] =
    &[VERILOG_1995, VERILOG_2001_EXT, VERILOG_2005_EXT, SV_2005_EXT, SV_2009_EXT, SV_2012_EXT];

#[rustfmt::skip]
const VERILOG_1995: &[&str] = &[
    "always", "and", "assign", "begin", "buf", "bufif0", "bufif1", "case",
    "casex", "casez", "cmos", "deassign", "default", "defparam", "disable",
    "edge", "else", "end", "endcase", "endfunction", "endmodule",
    "endprimitive", "endspecify", "endtable", "endtask", "event", "for",
    "force", "forever", "fork", "function", "highz0", "highz1", "if",
    "ifnone", "initial", "inout", "input", "integer", "join", "large",
    "macromodule", "medium", "module", "nand", "negedge", "nmos", "nor",
    "not", "notif0", "notif1", "or", "output", "parameter", "pmos",
    "posedge", "primitive", "pull0", "pull1", "pulldown", "pullup", "rcmos",
    "real", "realtime", "reg", "release", "repeat", "rnmos", "rpmos",
    "rtran", "rtranif0", "rtranif1", "scalared", "small", "specify",
    "specparam", "strong0", "strong1", "supply0", "supply1", "table",
    "task", "time", "tran", "tranif0", "tranif1", "tri", "tri0", "tri1",
    "triand", "trior", "trireg", "vectored", "wait", "wand", "weak0",
    "weak1", "while", "wire", "wor", "xnor", "xor",
];

#[rustfmt::skip]
const VERILOG_2001_EXT: &[&str] = &[
    "automatic", "cell", "config", "design", "endconfig", "endgenerate",
    "generate", "genvar", "incdir", "include", "instance", "liblist",
    "library", "localparam", "noshowcancelled", "pulsestyle_ondetect",
    "pulsestyle_onevent", "showcancelled", "signed", "unsigned", "use",
];

const VERILOG_2005_EXT: &[&str] = &["uwire"];

#[rustfmt::skip]
const SV_2005_EXT: &[&str] = &[
    "alias", "always_comb", "always_ff", "always_latch", "assert", "assume",
    "before", "bind", "bins", "binsof", "bit", "break", "byte", "chandle",
    "class", "clocking", "const", "constraint", "context", "continue",
    "cover", "covergroup", "coverpoint", "cross", "dist", "do", "endclass",
    "endclocking", "endgroup", "endinterface", "endpackage", "endprogram",
    "endproperty", "endsequence", "enum", "expect", "export", "extends",
    "extern", "final", "first_match", "foreach", "forkjoin", "iff",
    "ignore_bins", "illegal_bins", "import", "inside", "int", "interface",
    "intersect", "join_any", "join_none", "local", "logic", "longint",
    "matches", "modport", "new", "null", "package", "packed", "priority",
    "program", "property", "protected", "pure", "rand", "randc",
    "randcase", "randsequence", "ref", "return", "sequence", "shortint",
    "shortreal", "solve", "static", "string", "struct", "super", "tagged",
    "this", "throughout", "timeprecision", "timeunit", "type", "typedef",
    "union", "unique", "var", "virtual", "void", "wait_order", "wildcard",
    "with", "within",
];

#[rustfmt::skip]
const SV_2009_EXT: &[&str] = &[
    "accept_on", "checker", "endchecker", "eventually", "global", "implies",
    "let", "nexttime", "reject_on", "restrict", "s_always", "s_eventually",
    "s_nexttime", "s_until", "s_until_with", "strong", "sync_accept_on",
    "sync_reject_on", "unique0", "until", "until_with", "untyped", "weak",
];

const SV_2012_EXT: &[&str] = &["implements", "interconnect", "nettype", "soft"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables_are_sorted() {
        for tier in TIERS {
            for pair in tier.windows(2) {
                assert!(pair[0] < pair[1], "{} >= {}", pair[0], pair[1]);
            }
        }
    }

    #[test]
    fn keywords_accumulate() {
        assert!(is_keyword("module", LanguageStandard::Verilog1995));
        assert!(!is_keyword("generate", LanguageStandard::Verilog1995));
        assert!(is_keyword("generate", LanguageStandard::Verilog2001));
        assert!(!is_keyword("logic", LanguageStandard::Verilog2005));
        assert!(is_keyword("logic", LanguageStandard::SystemVerilog2005));
        assert!(is_keyword("checker", LanguageStandard::SystemVerilog2023));
        assert!(!is_keyword("checker", LanguageStandard::SystemVerilog2005));
        assert!(!is_keyword("my_signal", LanguageStandard::SystemVerilog2023));
    }

    #[test]
    fn designations_round_trip() {
        for designation in ["1364-1995", "1364-2001", "1800-2012", "1800-2023"] {
            let standard = LanguageStandard::from_ieee(designation).unwrap();
            assert_eq!(standard.ieee(), designation);
        }
        assert!(LanguageStandard::from_ieee("1800-1999").is_none());
    }
}
