use std::time::{Duration, Instant};

use crate::core::SamplerConfig;
use crate::error::{Result, WsdlSamplerError};

/// Per-run state threaded through every resolver call.
///
/// Holds the stack of complex types and element references currently being
/// expanded (the cycle guard), the element path used in error messages, and
/// the statistics of the run.
#[derive(Debug, Clone)]
pub struct SynthesisContext {
    pub config: SamplerConfig,
    pub stats: ResolutionStats,
    active_types: Vec<String>,
    active_elements: Vec<String>,
    path: Vec<String>,
    start_time: Option<Instant>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolutionStats {
    pub samples_synthesized: usize,
    pub elements_resolved: usize,
    pub attributes_resolved: usize,
    pub choices_expanded: usize,
    pub extensions_applied: usize,
    pub opaque_references: usize,
    pub truncated_recursions: usize,
    pub duration: Option<Duration>,
    pub warnings: Vec<String>,
}

/// Which stack a guarded name lives on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardKind {
    ComplexType,
    ElementRef,
}

impl SynthesisContext {
    pub fn new(config: &SamplerConfig) -> Self {
        Self {
            config: config.clone(),
            stats: ResolutionStats::default(),
            active_types: Vec::new(),
            active_elements: Vec::new(),
            path: Vec::new(),
            start_time: None,
        }
    }

    pub fn begin_run(&mut self) {
        self.start_time = Some(Instant::now());
        self.stats = ResolutionStats::default();
        self.active_types.clear();
        self.active_elements.clear();
        self.path.clear();
    }

    pub fn end_run(&mut self) {
        if let Some(start_time) = self.start_time {
            self.stats.duration = Some(start_time.elapsed());
        }

        tracing::info!(
            "Synthesized {} samples: {} elements, {} choices, {} extensions, {} opaque references, {} truncated recursions",
            self.stats.samples_synthesized,
            self.stats.elements_resolved,
            self.stats.choices_expanded,
            self.stats.extensions_applied,
            self.stats.opaque_references,
            self.stats.truncated_recursions
        );
    }

    /// Step into a child element. Fails once the path is deeper than `max_depth`.
    pub fn enter(&mut self, segment: &str) -> Result<()> {
        self.path.push(segment.to_string());
        if self.depth() > self.config.max_depth {
            return Err(WsdlSamplerError::DepthLimitExceeded {
                depth: self.config.max_depth,
                path: self.current_path(),
            });
        }
        Ok(())
    }

    pub fn leave(&mut self) {
        self.path.pop();
    }

    pub fn depth(&self) -> usize {
        self.path.len()
    }

    pub fn current_path(&self) -> String {
        if self.path.is_empty() {
            "/".to_string()
        } else {
            format!("/{}", self.path.join("/"))
        }
    }

    pub fn is_active(&self, kind: GuardKind, name: &str) -> bool {
        self.stack(kind).iter().any(|active| active == name)
    }

    pub fn push_active(&mut self, kind: GuardKind, name: &str) {
        self.stack_mut(kind).push(name.to_string());
    }

    pub fn pop_active(&mut self, kind: GuardKind) {
        self.stack_mut(kind).pop();
    }

    fn stack(&self, kind: GuardKind) -> &Vec<String> {
        match kind {
            GuardKind::ComplexType => &self.active_types,
            GuardKind::ElementRef => &self.active_elements,
        }
    }

    fn stack_mut(&mut self, kind: GuardKind) -> &mut Vec<String> {
        match kind {
            GuardKind::ComplexType => &mut self.active_types,
            GuardKind::ElementRef => &mut self.active_elements,
        }
    }

    pub fn add_warning(&mut self, warning: String) {
        tracing::warn!("{}", warning);
        self.stats.warnings.push(warning);
    }

    pub fn record_opaque_reference(&mut self, reference: &str) {
        self.stats.opaque_references += 1;
        self.add_warning(format!(
            "Unresolved type reference `{}` at {}, using it as an opaque leaf",
            reference,
            self.current_path()
        ));
    }

    pub fn record_truncation(&mut self, name: &str) {
        self.stats.truncated_recursions += 1;
        self.add_warning(format!(
            "Recursive reference to `{}` at {} truncated",
            name,
            self.current_path()
        ));
    }
}

impl ResolutionStats {
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_depth_limit() {
        let config = SamplerConfig::default().with_max_depth(2);
        let mut context = SynthesisContext::new(&config);

        context.enter("a").unwrap();
        context.enter("b").unwrap();
        assert_eq!(context.depth(), 2);
        context.leave();
        assert_eq!(context.depth(), 1);
        context.enter("b").unwrap();
        let err = context.enter("c").unwrap_err();
        match err {
            WsdlSamplerError::DepthLimitExceeded { depth, path } => {
                assert_eq!(depth, 2);
                assert_eq!(path, "/a/b/c");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_guard_stacks_are_separate() {
        let mut context = SynthesisContext::new(&SamplerConfig::default());
        context.push_active(GuardKind::ComplexType, "Node");

        assert!(context.is_active(GuardKind::ComplexType, "Node"));
        assert!(!context.is_active(GuardKind::ElementRef, "Node"));

        context.pop_active(GuardKind::ComplexType);
        assert!(!context.is_active(GuardKind::ComplexType, "Node"));
    }

    #[test]
    fn test_warnings_are_recorded() {
        let mut context = SynthesisContext::new(&SamplerConfig::default());
        context.enter("Order").unwrap();
        context.record_opaque_reference("tns:Missing");

        assert_eq!(context.stats.opaque_references, 1);
        assert!(context.stats.has_warnings());
        assert!(context.stats.warnings[0].contains("/Order"));
    }
}
