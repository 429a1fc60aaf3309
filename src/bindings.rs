//! Binding registry
//!
//! Associates physical controls with value endpoints from the external host
//! layer. The host object graph is consumed strictly as a capability: the
//! registry never learns what an endpoint is, only that it can be read and
//! written. Bindings are keyed by (page, subpage, control) so rebinding
//! happens implicitly on page/subpage activation - resolution just uses the
//! active scope.

use crate::jog::CommandSink;
use crate::pages::PageId;
use std::collections::HashMap;

/// A bindable host value endpoint: get/set plus identity via the binding key
pub trait BoundEndpoint: Send {
    fn current_value(&self) -> f64;
    fn set_value(&mut self, value: f64);
}

/// Physical control addressed by a binding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlRef {
    /// Strip fader, 0-based strip index
    Fader(u8),
    /// Strip fader touch sensor
    FaderTouch(u8),
    /// Strip rotary encoder
    Encoder(u8),
    /// Strip encoder push
    EncoderPush(u8),
    /// Any LED button, by note number
    Button(u8),
    /// The ninth fader
    MasterFader,
}

type EndpointKey = (PageId, Option<String>, ControlRef);

/// Thin lookup from physical controls to host endpoints
#[derive(Default)]
pub struct BindingRegistry {
    endpoints: HashMap<EndpointKey, Box<dyn BoundEndpoint>>,
    jog_increase: HashMap<String, Box<dyn CommandSink + Send>>,
    jog_decrease: HashMap<String, Box<dyn CommandSink + Send>>,
}

impl BindingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a control to an endpoint, optionally scoped to one subpage.
    ///
    /// Idempotent: binding the same key again replaces the previous endpoint,
    /// so hosts that submit value bindings twice are harmless.
    pub fn bind(
        &mut self,
        page: PageId,
        subpage: Option<&str>,
        control: ControlRef,
        endpoint: Box<dyn BoundEndpoint>,
    ) {
        self.endpoints
            .insert((page, subpage.map(str::to_string), control), endpoint);
    }

    /// Resolve a control in the active scope: subpage-specific binding first,
    /// then the page-wide fallback.
    pub fn resolve(
        &mut self,
        page: PageId,
        subpage: &str,
        control: ControlRef,
    ) -> Option<&mut Box<dyn BoundEndpoint>> {
        let scoped: EndpointKey = (page, Some(subpage.to_string()), control);
        if self.endpoints.contains_key(&scoped) {
            return self.endpoints.get_mut(&scoped);
        }
        self.endpoints.get_mut(&(page, None, control))
    }

    /// Register the jog command sinks for a jog subpage
    pub fn bind_jog(
        &mut self,
        subpage: &str,
        increase: Box<dyn CommandSink + Send>,
        decrease: Box<dyn CommandSink + Send>,
    ) {
        self.jog_increase.insert(subpage.to_string(), increase);
        self.jog_decrease.insert(subpage.to_string(), decrease);
    }

    /// Both jog sinks for a subpage, if bound
    pub fn jog_sinks(
        &mut self,
        subpage: &str,
    ) -> Option<(&mut (dyn CommandSink + Send), &mut (dyn CommandSink + Send))> {
        let inc = self.jog_increase.get_mut(subpage)?;
        let dec = self.jog_decrease.get_mut(subpage)?;
        Some((inc.as_mut(), dec.as_mut()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeEndpoint {
        value: f64,
    }

    impl BoundEndpoint for FakeEndpoint {
        fn current_value(&self) -> f64 {
            self.value
        }
        fn set_value(&mut self, value: f64) {
            self.value = value;
        }
    }

    #[test]
    fn test_subpage_binding_shadows_page_binding() {
        let mut registry = BindingRegistry::new();
        let control = ControlRef::Fader(0);

        registry.bind(
            PageId::SelectedTrack,
            None,
            control,
            Box::new(FakeEndpoint { value: 0.1 }),
        );
        registry.bind(
            PageId::SelectedTrack,
            Some("EQ"),
            control,
            Box::new(FakeEndpoint { value: 0.9 }),
        );

        let ep = registry
            .resolve(PageId::SelectedTrack, "EQ", control)
            .unwrap();
        assert_eq!(ep.current_value(), 0.9);

        let ep = registry
            .resolve(PageId::SelectedTrack, "SendsQC", control)
            .unwrap();
        assert_eq!(ep.current_value(), 0.1);
    }

    #[test]
    fn test_duplicate_bind_replaces() {
        let mut registry = BindingRegistry::new();
        let control = ControlRef::Button(24);

        registry.bind(PageId::Mixer, None, control, Box::new(FakeEndpoint { value: 0.0 }));
        // Same binding submitted twice (host workaround), must not stack
        registry.bind(PageId::Mixer, None, control, Box::new(FakeEndpoint { value: 1.0 }));

        let ep = registry.resolve(PageId::Mixer, "Default", control).unwrap();
        assert_eq!(ep.current_value(), 1.0);
    }

    #[test]
    fn test_unbound_resolves_none() {
        let mut registry = BindingRegistry::new();
        assert!(registry
            .resolve(PageId::Midi, "Default", ControlRef::Encoder(2))
            .is_none());
    }
}
