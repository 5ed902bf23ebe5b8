//! Step definitions and the matcher that resolves step lines to them.
//!
//! Definitions are kept in registration order. Matching walks them in that
//! order and, within a definition, tries its patterns in the order they were
//! added; the first pattern to match wins.

use log::debug;
use regex::Regex;
use thiserror::Error;
use trellis_bdd_patterns::{
    CaptureKind, Multiline, PatternError, compile_step_pattern, extract_captured_values,
    extract_named_values,
};

use crate::{ExecutionContext, StepArguments, StepError};

/// Signature shared by all step handlers.
pub type StepFn<W> = dyn Fn(&mut ExecutionContext<'_, W>, &StepArguments) -> Result<(), StepError>;

/// Errors raised while resolving a step line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum MatchError {
    /// No registered pattern matches the step.
    #[error("no step definition matches `{text}`")]
    Unmatched {
        /// The step line as executed.
        text: String,
    },
    /// The matching pattern mixes named and unnamed groups.
    #[error("step pattern `{pattern}` mixes named and positional groups (matched `{text}`)")]
    MixedParameters {
        /// The step line as executed.
        text: String,
        /// Source of the offending pattern.
        pattern: String,
    },
}

#[derive(Debug)]
struct CompiledPattern {
    source: String,
    regex: Regex,
    kind: CaptureKind,
}

/// A handler together with every pattern that selects it.
pub struct StepDefinition<W> {
    name: String,
    patterns: Vec<CompiledPattern>,
    handler: Box<StepFn<W>>,
}

impl<W> StepDefinition<W> {
    /// Create a definition with no patterns yet.
    ///
    /// # Examples
    /// ```
    /// use trellis_bdd::{Multiline, StepDefinition};
    ///
    /// let definition = StepDefinition::<Vec<i64>>::new("push", |ctx, args| {
    ///     let value = args.parse(0)?;
    ///     ctx.world_mut().push(value);
    ///     Ok(())
    /// })
    /// .pattern(r"I push (-?\d+)", Multiline::None)
    /// .and_then(|d| d.pattern(r"(-?\d+) is pushed", Multiline::None))
    /// .unwrap_or_else(|e| panic!("{e}"));
    /// assert_eq!(definition.patterns().count(), 2);
    /// ```
    pub fn new<F>(name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&mut ExecutionContext<'_, W>, &StepArguments) -> Result<(), StepError> + 'static,
    {
        Self {
            name: name.into(),
            patterns: Vec::new(),
            handler: Box::new(handler),
        }
    }

    /// Add a pattern to the definition.
    ///
    /// # Errors
    /// Returns [`PatternError`] when the pattern does not compile.
    pub fn pattern(mut self, pattern: &str, multiline: Multiline) -> Result<Self, PatternError> {
        let regex = compile_step_pattern(pattern, &multiline)?;
        let kind = CaptureKind::of(&regex);
        self.patterns.push(CompiledPattern {
            source: pattern.to_string(),
            regex,
            kind,
        });
        Ok(self)
    }

    /// Name used in diagnostics and exposed as the current step handler.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Pattern sources in the order they were added.
    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(|p| p.source.as_str())
    }

    /// Run the handler.
    ///
    /// # Errors
    /// Propagates whatever the handler returns.
    pub fn invoke(
        &self,
        ctx: &mut ExecutionContext<'_, W>,
        arguments: &StepArguments,
    ) -> Result<(), StepError> {
        (self.handler)(ctx, arguments)
    }

    fn try_match(&self, text: &str) -> Option<Result<StepArguments, MatchError>> {
        self.patterns.iter().find_map(|pattern| match pattern.kind {
            CaptureKind::Positional => {
                extract_captured_values(&pattern.regex, text).map(|v| Ok(StepArguments::Positional(v)))
            }
            CaptureKind::Named => {
                extract_named_values(&pattern.regex, text).map(|v| Ok(StepArguments::Named(v)))
            }
            CaptureKind::Mixed => pattern.regex.is_match(text).then(|| {
                Err(MatchError::MixedParameters {
                    text: text.to_string(),
                    pattern: pattern.source.clone(),
                })
            }),
        })
    }
}

impl<W> std::fmt::Debug for StepDefinition<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StepDefinition")
            .field("name", &self.name)
            .field("patterns", &self.patterns().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

/// A resolved step: the definition to run and the arguments to pass.
#[derive(Debug)]
pub struct StepMatch<'r, W> {
    /// Definition whose pattern matched.
    pub definition: &'r StepDefinition<W>,
    /// Captured arguments.
    pub arguments: StepArguments,
}

/// Ordered catalogue of step definitions.
///
/// # Examples
/// ```
/// use trellis_bdd::{StepArguments, StepRegistry};
///
/// let mut steps = StepRegistry::<i64>::new();
/// steps
///     .step(r"I add (\d+) and (\d+)", |ctx, args| {
///         *ctx.world_mut() = args.parse::<i64>(0)? + args.parse::<i64>(1)?;
///         Ok(())
///     })
///     .unwrap_or_else(|e| panic!("{e}"));
///
/// let found = steps.find("Given I add 1 and 1").unwrap_or_else(|e| panic!("{e}"));
/// assert_eq!(found.arguments, StepArguments::Positional(vec!["1".into(), "1".into()]));
/// assert!(steps.find("Given I subtract 1").is_err());
/// ```
#[derive(Debug)]
pub struct StepRegistry<W> {
    definitions: Vec<StepDefinition<W>>,
}

impl<W> Default for StepRegistry<W> {
    fn default() -> Self {
        Self {
            definitions: Vec::new(),
        }
    }
}

impl<W> StepRegistry<W> {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a fully built definition.
    pub fn register(&mut self, definition: StepDefinition<W>) -> &mut Self {
        debug!(
            "registered step `{}` with {} pattern(s)",
            definition.name,
            definition.patterns.len()
        );
        self.definitions.push(definition);
        self
    }

    /// Register a single-line step, naming it after its pattern.
    ///
    /// # Errors
    /// Returns [`PatternError`] when the pattern does not compile.
    pub fn step<F>(&mut self, pattern: &str, handler: F) -> Result<&mut Self, PatternError>
    where
        F: Fn(&mut ExecutionContext<'_, W>, &StepArguments) -> Result<(), StepError> + 'static,
    {
        self.step_multiline(pattern, Multiline::None, handler)
    }

    /// Register a step whose pattern may capture trailing lines.
    ///
    /// # Errors
    /// Returns [`PatternError`] when the pattern does not compile.
    pub fn step_multiline<F>(
        &mut self,
        pattern: &str,
        multiline: Multiline,
        handler: F,
    ) -> Result<&mut Self, PatternError>
    where
        F: Fn(&mut ExecutionContext<'_, W>, &StepArguments) -> Result<(), StepError> + 'static,
    {
        let definition = StepDefinition::new(pattern, handler).pattern(pattern, multiline)?;
        Ok(self.register(definition))
    }

    /// Resolve `text` to the first definition with a matching pattern.
    ///
    /// # Errors
    /// Returns [`MatchError::Unmatched`] when nothing matches and
    /// [`MatchError::MixedParameters`] when the first matching pattern mixes
    /// named and unnamed groups.
    pub fn find(&self, text: &str) -> Result<StepMatch<'_, W>, MatchError> {
        for definition in &self.definitions {
            if let Some(result) = definition.try_match(text) {
                let arguments = result?;
                debug!("step `{text}` matched definition `{}`", definition.name);
                return Ok(StepMatch {
                    definition,
                    arguments,
                });
            }
        }
        Err(MatchError::Unmatched {
            text: text.to_string(),
        })
    }

    /// Whether some definition matches `text`, mixed groups included.
    #[must_use]
    pub fn matches(&self, text: &str) -> bool {
        self.definitions
            .iter()
            .any(|definition| definition.try_match(text).is_some())
    }

    /// Registered definitions in order.
    pub fn definitions(&self) -> impl Iterator<Item = &StepDefinition<W>> {
        self.definitions.iter()
    }

    /// Number of registered definitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Whether no definitions are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}
