use crate::error::Error;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Populated,
    Failed,
}

/// One independently loaded piece of view state.
///
/// A failed load keeps whatever data was there before, so a list keeps
/// rendering its last good contents.
#[derive(Debug, Clone)]
pub struct Resource<T> {
    state: LoadState,
    data: Option<T>,
    last_error: Option<String>,
}

impl<T> Default for Resource<T> {
    fn default() -> Self {
        Self {
            state: LoadState::Idle,
            data: None,
            last_error: None,
        }
    }
}

impl<T> Resource<T> {
    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == LoadState::Loading
    }

    pub(crate) fn get_mut(&mut self) -> Option<&mut T> {
        self.data.as_mut()
    }

    pub fn get(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn begin(&mut self) {
        self.state = LoadState::Loading;
    }

    pub fn resolve(&mut self, data: T) {
        self.data = Some(data);
        self.state = LoadState::Populated;
        self.last_error = None;
    }

    pub fn reject(&mut self, err: &Error) {
        self.state = LoadState::Failed;
        self.last_error = Some(err.to_string());
    }

    /// Back to the previous settled state after a cancelled load.
    pub fn abandon(&mut self) {
        if self.state == LoadState::Loading {
            self.state = if self.data.is_some() {
                LoadState::Populated
            } else {
                LoadState::Idle
            };
        }
    }
}

impl<T: Default> Resource<T> {
    pub(crate) fn get_or_default_mut(&mut self) -> &mut T {
        self.data.get_or_insert_with(T::default)
    }

    pub(crate) fn mark_populated(&mut self) {
        self.data.get_or_insert_with(T::default);
        self.state = LoadState::Populated;
        self.last_error = None;
    }
}

impl<T> Resource<Vec<T>> {
    /// Whatever has resolved so far; empty before the first load.
    pub fn items(&self) -> &[T] {
        self.data.as_deref().unwrap_or(&[])
    }
}
