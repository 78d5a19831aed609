use tracing::{debug, warn};

use crate::api::{ApiError, Todo, TodoBackend};

#[derive(Debug, Clone, PartialEq)]
pub enum ViewStatus {
    Loading,
    Ready(Vec<Todo>),
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormField {
    #[default]
    Name,
    Description,
}

/// Input for a todo that has not been submitted yet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTodoForm {
    pub name: String,
    pub description: String,
    pub focus: FormField,
}

impl NewTodoForm {
    pub fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            FormField::Name => &mut self.name,
            FormField::Description => &mut self.description,
        }
    }

    pub fn switch_field(&mut self) {
        self.focus = match self.focus {
            FormField::Name => FormField::Description,
            FormField::Description => FormField::Name,
        };
    }
}

/// Client-side state of the todo screen.
///
/// Every mutation bumps `collection_version` once its response is in, and the
/// list is then fetched again; nothing is patched locally.
pub struct TodoView<B> {
    backend: B,
    collection_version: u64,
    status: ViewStatus,
    form: Option<NewTodoForm>,
    notice: Option<String>,
    selected: usize,
    selected_id: Option<i32>,
}

impl<B: TodoBackend> TodoView<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            collection_version: 0,
            status: ViewStatus::Loading,
            form: None,
            notice: None,
            selected: 0,
            selected_id: None,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn collection_version(&self) -> u64 {
        self.collection_version
    }

    pub fn status(&self) -> &ViewStatus {
        &self.status
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn clear_notice(&mut self) {
        self.notice = None;
    }

    pub fn form(&self) -> Option<&NewTodoForm> {
        self.form.as_ref()
    }

    pub fn form_mut(&mut self) -> Option<&mut NewTodoForm> {
        self.form.as_mut()
    }

    pub fn open_form(&mut self) {
        self.form.get_or_insert_with(NewTodoForm::default);
    }

    pub fn close_form(&mut self) {
        self.form = None;
    }

    /// Incomplete todos first, then completed ones, each group in service order.
    /// Empty unless the last fetch succeeded.
    pub fn ordered(&self) -> Vec<&Todo> {
        let ViewStatus::Ready(todos) = &self.status else {
            return Vec::new();
        };
        let (mut open, done): (Vec<&Todo>, Vec<&Todo>) =
            todos.iter().partition(|todo| !todo.completed);
        open.extend(done);
        open
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected_todo(&self) -> Option<&Todo> {
        self.ordered().get(self.selected).copied()
    }

    pub fn select_next(&mut self) {
        let len = self.ordered().len();
        if len > 0 {
            self.selected = (self.selected + 1) % len;
            self.remember_selection();
        }
    }

    pub fn select_previous(&mut self) {
        let len = self.ordered().len();
        if len > 0 {
            self.selected = self.selected.checked_sub(1).unwrap_or(len - 1);
            self.remember_selection();
        }
    }

    fn remember_selection(&mut self) {
        self.selected_id = self.selected_todo().map(|todo| todo.id);
    }

    pub async fn refresh(&mut self) {
        self.status = ViewStatus::Loading;
        self.status = match self.backend.list().await {
            Ok(todos) => ViewStatus::Ready(todos),
            Err(err) => {
                warn!(error = %err, "failed to load todos");
                ViewStatus::Failed(err.notice())
            }
        };
        if !matches!(self.status, ViewStatus::Ready(_)) {
            return;
        }

        // the cursor follows its todo when a toggle moves it to the other group
        let ordered = self.ordered();
        let position = self
            .selected_id
            .and_then(|id| ordered.iter().position(|todo| todo.id == id));
        let fallback = self.selected.min(ordered.len().saturating_sub(1));
        self.selected = position.unwrap_or(fallback);
        self.remember_selection();
    }

    /// Submits and closes the form, whatever the outcome.
    pub async fn submit_form(&mut self) {
        let Some(form) = self.form.take() else {
            return;
        };
        let description = Some(form.description.trim()).filter(|value| !value.is_empty());
        let result = self.backend.create(form.name.trim(), description).await;
        self.after_mutation(result.map(|id| debug!(todo_id = id, "todo created")))
            .await;
    }

    pub async fn toggle_selected(&mut self) {
        if let Some(id) = self.selected_todo().map(|todo| todo.id) {
            self.toggle(id).await;
        }
    }

    pub async fn toggle(&mut self, id: i32) {
        let result = self.backend.toggle(id).await;
        self.after_mutation(result.map(|_| ())).await;
    }

    pub async fn delete_selected(&mut self) {
        if let Some(id) = self.selected_todo().map(|todo| todo.id) {
            self.delete(id).await;
        }
    }

    pub async fn delete(&mut self, id: i32) {
        let result = self.backend.delete(id).await;
        self.after_mutation(result.map(|message| debug!(%message, "todo deleted")))
            .await;
    }

    async fn after_mutation(&mut self, result: Result<(), ApiError>) {
        match result {
            Ok(()) => self.notice = None,
            Err(err) => {
                warn!(error = %err, "todo mutation rejected");
                self.notice = Some(err.notice());
            }
        }
        self.collection_version += 1;
        self.refresh().await;
    }
}
