//! Architecture layers of the network and the source paths that implement them.

use regex::Regex;
use serde::Serialize;

use crate::error::ParseError;

/// Glob-style path pattern: `*` matches any run of characters (slashes
/// included), `?` matches one character. Anchored at both ends.
#[derive(Debug, Clone)]
pub struct PathPattern {
    source: String,
    regex: Regex,
}

impl PathPattern {
    pub fn new(pattern: &str) -> Result<Self, ParseError> {
        let mut expr = String::with_capacity(pattern.len() + 8);
        expr.push('^');
        for c in pattern.chars() {
            match c {
                '*' => expr.push_str(".*"),
                '?' => expr.push('.'),
                other => expr.push_str(&regex::escape(other.encode_utf8(&mut [0; 4]))),
            }
        }
        expr.push('$');

        let regex = Regex::new(&expr).map_err(|e| ParseError::Pattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            source: pattern.to_string(),
            regex,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn matches(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }
}

/// Compile patterns; the first invalid one fails the whole list.
pub fn compile_patterns<S: AsRef<str>>(patterns: &[S]) -> Result<Vec<PathPattern>, ParseError> {
    patterns.iter().map(|p| PathPattern::new(p.as_ref())).collect()
}

/// Canvas position of a layer node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

/// One architecture layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArchitectureLayer {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub paths: &'static [&'static str],
    pub color: &'static str,
    pub position: Position,
}

impl ArchitectureLayer {
    pub fn patterns(&self) -> Result<Vec<PathPattern>, ParseError> {
        compile_patterns(self.paths)
    }

    /// Whether any of this layer's patterns claims `path`.
    pub fn claims(&self, path: &str) -> bool {
        match self.patterns() {
            Ok(patterns) => patterns.iter().any(|p| p.matches(path)),
            Err(_) => false,
        }
    }
}

pub const LAYERS: &[ArchitectureLayer] = &[
    ArchitectureLayer {
        id: "consensus",
        name: "Consensus Layer",
        description: "Byzantine fault tolerant consensus protocol",
        paths: &["rs/consensus/*", "ic-os/*/consensus/*"],
        color: "#3b82f6",
        position: Position { x: 250.0, y: 50.0 },
    },
    ArchitectureLayer {
        id: "execution",
        name: "Execution Layer",
        description: "WebAssembly canister execution environment",
        paths: &["rs/execution_environment/*", "rs/canister_sandbox/*"],
        color: "#8b5cf6",
        position: Position { x: 250.0, y: 150.0 },
    },
    ArchitectureLayer {
        id: "messaging",
        name: "Message Routing",
        description: "Cross-subnet and inter-canister messaging",
        paths: &["rs/messaging/*", "rs/xnet/*"],
        color: "#ec4899",
        position: Position { x: 250.0, y: 250.0 },
    },
    ArchitectureLayer {
        id: "networking",
        name: "Networking Layer",
        description: "P2P networking and transport protocols",
        paths: &["rs/p2p/*", "rs/transport/*"],
        color: "#10b981",
        position: Position { x: 250.0, y: 350.0 },
    },
    ArchitectureLayer {
        id: "crypto",
        name: "Cryptography",
        description: "Chain-key cryptography and threshold signatures",
        paths: &["rs/crypto/*", "rs/types/types/src/crypto/*"],
        color: "#f59e0b",
        position: Position { x: 550.0, y: 50.0 },
    },
    ArchitectureLayer {
        id: "state",
        name: "State Management",
        description: "Replicated state and certification",
        paths: &["rs/state_manager/*", "rs/replicated_state/*"],
        color: "#06b6d4",
        position: Position { x: 550.0, y: 150.0 },
    },
    ArchitectureLayer {
        id: "registry",
        name: "Registry",
        description: "Network topology and configuration",
        paths: &["rs/registry/*", "rs/nns/registry/*"],
        color: "#84cc16",
        position: Position { x: 550.0, y: 250.0 },
    },
    ArchitectureLayer {
        id: "orchestrator",
        name: "Orchestrator",
        description: "Node and replica management",
        paths: &["ic-os/*/orchestrator/*", "rs/orchestrator/*"],
        color: "#ef4444",
        position: Position { x: 550.0, y: 350.0 },
    },
];

pub fn layer(id: &str) -> Option<&'static ArchitectureLayer> {
    LAYERS.iter().find(|l| l.id == id)
}

/// Layers whose patterns claim `path`.
pub fn layers_for_path(path: &str) -> Vec<&'static ArchitectureLayer> {
    LAYERS.iter().filter(|l| l.claims(path)).collect()
}
