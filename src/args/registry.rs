//! Flag registry: every prefix the launcher hands to the VM.

/// Token that ends runtime flag scanning; it and everything after it
/// belong to the application.
pub const APPLICATION_MARKER: &str = "-jar";

/// Tokens not starting with this are application specifiers.
pub const FLAG_PREFIX: char = '-';

/// Family a runtime flag belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagKind {
    /// `-verbose`, `-verbose:gc`, ...
    Verbose,
    /// `-Dname=value` system property.
    Define,
    /// `-X...` extended VM option.
    Extended,
    /// `-javaagent`, `-agentlib`, `-agentpath`.
    Agent,
    /// `-ea`, `-da`, `-esa`, `-dsa` and their long forms.
    Assertions,
}

/// A single runtime flag definition, matched by prefix.
#[derive(Debug, Clone)]
pub struct FlagDef {
    pub prefix: &'static str,
    pub kind: FlagKind,
}

impl FlagDef {
    const fn new(prefix: &'static str, kind: FlagKind) -> Self {
        Self { prefix, kind }
    }

    /// Check if this definition matches the given argument string.
    pub fn matches(&self, arg: &str) -> bool {
        arg.starts_with(self.prefix)
    }
}

/// Build the complete runtime flag registry.
pub fn flag_registry() -> Vec<FlagDef> {
    vec![
        FlagDef::new("-verbose", FlagKind::Verbose),
        FlagDef::new("-D", FlagKind::Define),
        FlagDef::new("-X", FlagKind::Extended),
        FlagDef::new("-javaagent", FlagKind::Agent),
        FlagDef::new("-agentlib", FlagKind::Agent),
        FlagDef::new("-agentpath", FlagKind::Agent),
        FlagDef::new("-enableassertions", FlagKind::Assertions),
        FlagDef::new("-disableassertions", FlagKind::Assertions),
        FlagDef::new("-enablesystemassertions", FlagKind::Assertions),
        FlagDef::new("-disablesystemassertions", FlagKind::Assertions),
        FlagDef::new("-ea", FlagKind::Assertions),
        FlagDef::new("-da", FlagKind::Assertions),
        FlagDef::new("-esa", FlagKind::Assertions),
        FlagDef::new("-dsa", FlagKind::Assertions),
    ]
}

/// Which heap bound a sizing flag expresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeapBound {
    Min,
    Max,
}

impl HeapBound {
    /// Both accepted spellings, e.g. `-Xmx512m` and `-mx512m`.
    pub fn spellings(self) -> [&'static str; 2] {
        match self {
            HeapBound::Min => ["-Xms", "-ms"],
            HeapBound::Max => ["-Xmx", "-mx"],
        }
    }

    /// Identify the bound a token sets, if any.
    pub fn of(arg: &str) -> Option<HeapBound> {
        [HeapBound::Min, HeapBound::Max]
            .into_iter()
            .find(|bound| bound.spellings().iter().any(|p| arg.starts_with(p)))
    }
}
