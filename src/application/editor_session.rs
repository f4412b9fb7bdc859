// Editor session - the single owner of live config, selection and history
use crate::application::edit_history::{EditBatch, EditHistory};
use crate::application::error::{Result, SessionError};
use crate::application::grid_format::detect_layout_mode;
use crate::application::layout_selector::{
    encode_placements, resolve_view_layout, ResolvedLayout,
};
use crate::domain::card::Card;
use crate::domain::dashboard::Dashboard;
use crate::domain::layout::{GridPlacement, LayoutMode};
use crate::domain::snapshot::DashboardSnapshot;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub view: usize,
    #[serde(default)]
    pub card: Option<usize>,
}

#[derive(Debug)]
struct ActiveDrag {
    view: usize,
    mode: LayoutMode,
    batch: EditBatch,
}

/// All mutable editor state. Every change to the dashboard goes through a
/// method here, and every committed change produces exactly one history entry.
#[derive(Debug)]
pub struct DashboardEditorSession {
    config: Dashboard,
    file_path: Option<PathBuf>,
    selection: Option<Selection>,
    history: EditHistory,
    drag: Option<ActiveDrag>,
}

impl DashboardEditorSession {
    /// Start a session on a freshly loaded config. The loaded state is the
    /// first history entry and counts as saved.
    pub fn open(config: Dashboard, file_path: Option<PathBuf>) -> Self {
        let mut history = EditHistory::new();
        history.commit(DashboardSnapshot::capture(&config));
        history.mark_clean();

        tracing::info!(
            "Opened dashboard {:?} with {} views",
            config.title,
            config.views.len()
        );

        Self {
            config,
            file_path,
            selection: None,
            history,
            drag: None,
        }
    }

    pub fn config(&self) -> &Dashboard {
        &self.config
    }

    /// The config as of the last commit. Differs from `config` only while a
    /// drag is in progress.
    pub fn committed_config(&self) -> &Dashboard {
        self.history
            .current()
            .map_or(&self.config, DashboardSnapshot::as_dashboard)
    }

    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    pub fn history(&self) -> &EditHistory {
        &self.history
    }

    pub fn is_dirty(&self) -> bool {
        self.history.is_dirty()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn view_layout(&self, view: usize) -> Result<ResolvedLayout> {
        self.config
            .view(view)
            .map(resolve_view_layout)
            .ok_or(SessionError::ViewNotFound(view))
    }

    /// Replace the whole config, e.g. after an edit in the text editor.
    pub fn apply_edit(&mut self, config: Dashboard) {
        self.discard_drag();
        self.config = config;
        self.commit();
    }

    /// Apply placements reported by the drag surface, encoded in the view's
    /// current layout mode. Returns whether the view changed; an unchanged
    /// view adds no history entry.
    pub fn update_view_placements(
        &mut self,
        view: usize,
        placements: &[GridPlacement],
    ) -> Result<bool> {
        self.discard_drag();
        let current = self.config.view(view).ok_or(SessionError::ViewNotFound(view))?;
        let mode = detect_layout_mode(current);
        let updated = encode_placements(current, mode, placements);
        if &updated == current {
            return Ok(false);
        }
        self.config.views[view] = updated;
        self.commit();
        Ok(true)
    }

    /// Append a card to a view, returning its index.
    pub fn add_card(&mut self, view: usize, card: Card) -> Result<usize> {
        self.discard_drag();
        let target = self
            .config
            .views
            .get_mut(view)
            .ok_or(SessionError::ViewNotFound(view))?;
        target.cards.push(card);
        let index = target.cards.len() - 1;
        self.commit();
        self.selection = Some(Selection {
            view,
            card: Some(index),
        });
        Ok(index)
    }

    pub fn remove_card(&mut self, view: usize, card: usize) -> Result<Card> {
        self.discard_drag();
        let target = self
            .config
            .views
            .get_mut(view)
            .ok_or(SessionError::ViewNotFound(view))?;
        if card >= target.cards.len() {
            return Err(SessionError::CardNotFound { view, card });
        }
        let removed = target.cards.remove(card);
        self.commit();
        // Cards after the removed one shift down by one.
        if let Some(selection) = self.selection.as_mut().filter(|s| s.view == view) {
            selection.card = match selection.card {
                Some(selected) if selected == card => None,
                Some(selected) if selected > card => Some(selected - 1),
                other => other,
            };
        }
        Ok(removed)
    }

    /// Start a live drag on a view. Updates until `end_drag` become one
    /// history entry.
    pub fn begin_drag(&mut self, view: usize) -> Result<ResolvedLayout> {
        if let Some(drag) = &self.drag {
            return Err(SessionError::DragInProgress(drag.view));
        }
        let layout = self.view_layout(view)?;
        self.drag = Some(ActiveDrag {
            view,
            mode: layout.mode,
            batch: self.history.begin_batch(),
        });
        Ok(layout)
    }

    pub fn drag_update(&mut self, placements: &[GridPlacement]) -> Result<()> {
        let drag = self.drag.as_mut().ok_or(SessionError::NoDragInProgress)?;
        let view = &self.config.views[drag.view];
        self.config.views[drag.view] = encode_placements(view, drag.mode, placements);
        drag.batch.apply(DashboardSnapshot::capture(&self.config));
        Ok(())
    }

    /// Finish the drag; returns whether anything was committed.
    pub fn end_drag(&mut self) -> Result<bool> {
        let drag = self.drag.take().ok_or(SessionError::NoDragInProgress)?;
        Ok(self.history.end_batch(drag.batch))
    }

    /// Abandon the drag and put the live config back to the last commit.
    pub fn cancel_drag(&mut self) -> Result<()> {
        if self.drag.is_none() {
            return Err(SessionError::NoDragInProgress);
        }
        self.discard_drag();
        Ok(())
    }

    pub fn undo(&mut self) -> bool {
        self.discard_drag();
        let Some(snapshot) = self.history.undo() else {
            return false;
        };
        self.config = snapshot.to_dashboard();
        self.revalidate_selection();
        true
    }

    pub fn redo(&mut self) -> bool {
        self.discard_drag();
        let Some(snapshot) = self.history.redo() else {
            return false;
        };
        self.config = snapshot.to_dashboard();
        self.revalidate_selection();
        true
    }

    pub fn select(&mut self, selection: Option<Selection>) -> Result<()> {
        if let Some(selection) = selection {
            let view = self
                .config
                .view(selection.view)
                .ok_or(SessionError::ViewNotFound(selection.view))?;
            if let Some(card) = selection.card.filter(|c| *c >= view.cards.len()) {
                return Err(SessionError::CardNotFound {
                    view: selection.view,
                    card,
                });
            }
        }
        self.selection = selection;
        Ok(())
    }

    /// Record that the current config has been written out.
    pub fn mark_saved(&mut self) {
        self.history.mark_clean();
    }

    fn commit(&mut self) {
        self.history.commit(DashboardSnapshot::capture(&self.config));
    }

    fn discard_drag(&mut self) {
        let Some(drag) = self.drag.take() else {
            return;
        };
        tracing::debug!(
            "Discarding drag on view {} after {} updates",
            drag.view,
            drag.batch.updates()
        );
        if let Some(current) = self.history.current() {
            self.config = current.to_dashboard();
        }
    }

    fn revalidate_selection(&mut self) {
        let Some(selection) = self.selection else {
            return;
        };
        self.selection = match self.config.view(selection.view) {
            None => None,
            Some(view) => Some(Selection {
                view: selection.view,
                card: selection.card.filter(|c| *c < view.cards.len()),
            }),
        };
    }
}
