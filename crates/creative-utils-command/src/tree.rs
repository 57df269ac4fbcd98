//! Literal/argument command tree.
//!
//! A command is a path of whitespace-separated tokens. Each node of the tree is
//! either a fixed literal (`FlightSpeedSet`) or a typed argument (`<speed>`), and
//! any node may carry an action that runs when input ends on it.

use crate::error::CommandError;

/// Type of an argument node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ArgumentType {
    /// A finite float within `min..=max`, written as plain decimal digits.
    Float { min: f32, max: f32 },
}

/// A parsed argument value.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    Float(f32),
}

/// Named argument values collected while walking the tree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments {
    values: Vec<(String, ArgValue)>,
}

impl Arguments {
    /// Get a float argument by name.
    pub fn float(&self, name: &str) -> Option<f32> {
        let ArgValue::Float(v) = self.get(name)?;
        Some(*v)
    }

    fn get(&self, name: &str) -> Option<&ArgValue> {
        self.values.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    fn push(&mut self, name: &str, value: ArgValue) {
        self.values.push((name.to_string(), value));
    }
}

#[derive(Debug, Clone)]
enum NodeKind {
    Literal(String),
    Argument { name: String, kind: ArgumentType },
}

/// One node of a command tree.
#[derive(Debug, Clone)]
pub struct CommandNode<A> {
    kind: NodeKind,
    action: Option<A>,
    children: Vec<CommandNode<A>>,
}

impl<A> CommandNode<A> {
    /// A node matching exactly `name` (case-sensitive).
    pub fn literal(name: &str) -> Self {
        Self {
            kind: NodeKind::Literal(name.to_string()),
            action: None,
            children: Vec::new(),
        }
    }

    /// A node consuming one token as a typed argument.
    pub fn argument(name: &str, kind: ArgumentType) -> Self {
        Self {
            kind: NodeKind::Argument {
                name: name.to_string(),
                kind,
            },
            action: None,
            children: Vec::new(),
        }
    }

    /// Add a child node.
    pub fn then(mut self, child: CommandNode<A>) -> Self {
        self.children.push(child);
        self
    }

    /// Make this node executable.
    pub fn executes(mut self, action: A) -> Self {
        self.action = Some(action);
        self
    }

    /// Literal text or argument name.
    pub fn name(&self) -> &str {
        match &self.kind {
            NodeKind::Literal(name) => name,
            NodeKind::Argument { name, .. } => name,
        }
    }

    fn is_literal(&self, token: &str) -> bool {
        matches!(&self.kind, NodeKind::Literal(name) if name == token)
    }

    fn usage_token(&self) -> String {
        match &self.kind {
            NodeKind::Literal(name) => name.clone(),
            NodeKind::Argument { name, .. } => format!("<{name}>"),
        }
    }

    fn parse_argument(&self, token: &str) -> Option<Result<ArgValue, CommandError>> {
        let NodeKind::Argument { name, kind } = &self.kind else {
            return None;
        };
        let ArgumentType::Float { min, max } = *kind;
        let invalid = || CommandError::InvalidFloat {
            name: name.clone(),
            value: token.to_string(),
        };
        // Plain decimals only: no exponent, sign prefix, `inf` or `NaN`.
        if !token.chars().all(|c| c.is_ascii_digit() || c == '-' || c == '.') {
            return Some(Err(invalid()));
        }
        let value = match token.parse::<f32>() {
            Ok(v) if !v.is_finite() => Err(invalid()),
            Ok(v) if v < min || v > max => Err(CommandError::OutOfRange {
                name: name.clone(),
                value: v,
                min,
                max,
            }),
            Ok(v) => Ok(ArgValue::Float(v)),
            Err(_) => Err(invalid()),
        };
        Some(value)
    }

    fn collect_usage(&self, prefix: &str, out: &mut Vec<String>) {
        let path = if prefix.is_empty() {
            self.usage_token()
        } else {
            format!("{prefix} {}", self.usage_token())
        };
        if self.action.is_some() {
            out.push(path.clone());
        }
        for child in &self.children {
            child.collect_usage(&path, out);
        }
    }
}

/// Result of a successful parse.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation<A> {
    pub action: A,
    pub args: Arguments,
}

/// A set of root commands.
#[derive(Debug, Clone)]
pub struct CommandTree<A> {
    roots: Vec<CommandNode<A>>,
}

impl<A> Default for CommandTree<A> {
    fn default() -> Self {
        Self { roots: Vec::new() }
    }
}

impl<A: Clone> CommandTree<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a root node. A root with the same name is replaced.
    pub fn register(&mut self, root: CommandNode<A>) {
        self.roots.retain(|r| r.name() != root.name());
        self.roots.push(root);
    }

    pub fn contains(&self, root: &str) -> bool {
        self.roots.iter().any(|r| r.is_literal(root))
    }

    /// Parse a command line (with or without a leading `/`).
    pub fn parse(&self, input: &str) -> Result<Invocation<A>, CommandError> {
        let input = input.trim();
        let input = input.strip_prefix('/').unwrap_or(input);
        let mut tokens = input.split_whitespace();

        let first = tokens.next().ok_or(CommandError::Empty)?;
        let mut node = self
            .roots
            .iter()
            .find(|r| r.is_literal(first))
            .ok_or_else(|| CommandError::UnknownCommand(first.to_string()))?;
        let mut path = first.to_string();
        let mut args = Arguments::default();

        for token in tokens {
            // Literals win over arguments at the same level.
            if let Some(child) = node.children.iter().find(|c| c.is_literal(token)) {
                node = child;
            } else if let Some((child, value)) = node
                .children
                .iter()
                .find_map(|c| c.parse_argument(token).map(|v| (c, v)))
            {
                args.push(child.name(), value?);
                node = child;
            } else if node.children.is_empty() {
                return Err(CommandError::TrailingArguments {
                    path,
                    extra: token.to_string(),
                });
            } else {
                return Err(CommandError::UnknownArgument {
                    path,
                    token: token.to_string(),
                });
            }
            path.push(' ');
            path.push_str(token);
        }

        match &node.action {
            Some(action) => Ok(Invocation {
                action: action.clone(),
                args,
            }),
            None => {
                let mut usage = Vec::new();
                for child in &node.children {
                    child.collect_usage(&path, &mut usage);
                }
                Err(CommandError::Incomplete {
                    usage: usage.join(" | "),
                })
            }
        }
    }

    /// Every executable path under `root`, e.g. `CreativeUtils FlightSpeedSet <speed>`.
    pub fn usage(&self, root: &str) -> Vec<String> {
        let mut out = Vec::new();
        if let Some(node) = self.roots.iter().find(|r| r.is_literal(root)) {
            node.collect_usage("", &mut out);
        }
        out
    }
}
