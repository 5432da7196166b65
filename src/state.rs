/// Page-level state that outlives a single event callback.
///
/// `P` is the stashed `beforeinstallprompt` event; it is generic so the
/// transitions can be exercised without a browser.
#[derive(Debug)]
pub struct ShellState<P> {
    deferred_prompt: Option<P>,
    installed: bool,
    standalone: bool,
}

impl<P> Default for ShellState<P> {
    fn default() -> Self {
        Self {
            deferred_prompt: None,
            installed: false,
            standalone: false,
        }
    }
}

impl<P> ShellState<P> {
    pub fn new(standalone: bool) -> Self {
        Self {
            standalone,
            ..Self::default()
        }
    }

    /// Keeps the latest prompt. Returns whether the install button should be
    /// shown for it.
    pub fn defer_prompt(&mut self, prompt: P) -> bool {
        self.deferred_prompt = Some(prompt);
        self.can_install()
    }

    /// A prompt can be shown once; taking it clears the slot.
    pub fn take_prompt(&mut self) -> Option<P> {
        self.deferred_prompt.take()
    }

    pub fn mark_installed(&mut self) {
        self.installed = true;
        self.deferred_prompt = None;
    }

    pub fn can_install(&self) -> bool {
        self.deferred_prompt.is_some() && !self.installed && !self.standalone
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_is_single_use() {
        let mut state = ShellState::new(false);
        assert!(!state.can_install());

        assert!(state.defer_prompt("first"));
        assert!(state.defer_prompt("second"));
        assert_eq!(state.take_prompt(), Some("second"));
        assert_eq!(state.take_prompt(), None);
        assert!(!state.can_install());
    }

    #[test]
    fn installed_app_drops_prompt() {
        let mut state = ShellState::new(false);
        state.defer_prompt(1);

        state.mark_installed();

        assert_eq!(state.take_prompt(), None);
        assert!(!state.defer_prompt(2));
        assert!(!state.can_install());
    }

    #[test]
    fn standalone_never_offers_install() {
        let mut state = ShellState::new(true);
        assert!(!state.defer_prompt(()));
        assert_eq!(state.take_prompt(), Some(()));
    }
}
