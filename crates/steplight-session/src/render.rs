//! Render-state derivation.
//!
//! Pure functions over the coordinator's entities; nothing here holds state.

use steplight_core::{
    ActionId, ChannelStatus, ControlState, Controls, ItemView, JudgementView, PanelContents,
    PanelState,
};

use crate::ledger::RevealLedger;
use crate::presenter::{Presentation, ResponsePresenter};

pub fn panel_state(presenter: &ResponsePresenter, loading: bool) -> PanelState {
    if presenter.has_displayable_content() {
        PanelState::Populated
    } else if loading {
        PanelState::Loading
    } else {
        PanelState::Empty
    }
}

pub fn panel_contents(presenter: &ResponsePresenter) -> Option<PanelContents> {
    if !presenter.has_displayable_content() {
        return None;
    }

    let contents = match presenter.current()? {
        Presentation::ActiveItemDetail(active) => PanelContents::ActiveItemDetail {
            item: active.clone(),
            expanded: presenter.is_expanded(active.index),
        },
        Presentation::RevealList(ledger) => PanelContents::RevealList {
            kind: ledger.kind(),
            items: item_views(ledger, presenter),
            current_index: ledger.current_index(),
        },
        Presentation::StructuredResult(result) => PanelContents::StructuredResult {
            kind: result.kind,
            steps: result
                .steps
                .iter()
                .enumerate()
                .map(|(index, judgement)| JudgementView {
                    index,
                    judgement: judgement.clone(),
                    expanded: presenter.is_expanded(index),
                })
                .collect(),
            summary: result.summary.clone(),
            all_correct: result.all_correct(),
        },
        Presentation::StreamingText { text, complete } => PanelContents::StreamingText {
            text: text.clone(),
            streaming: !complete,
        },
        Presentation::Error(message) => PanelContents::Error {
            message: message.clone(),
        },
    };
    Some(contents)
}

fn item_views(ledger: &RevealLedger, presenter: &ResponsePresenter) -> Vec<ItemView> {
    ledger
        .items()
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let status = ledger.status(index);
            if !ledger.is_unlocked(index) {
                return ItemView {
                    index,
                    status,
                    text: None,
                    has_explanation: false,
                    expanded: false,
                    explanation: None,
                };
            }
            let expanded = presenter.is_expanded(index);
            ItemView {
                index,
                status,
                text: Some(item.text.clone()),
                has_explanation: item.explanation_text().is_some(),
                expanded,
                explanation: item
                    .explanation_text()
                    .filter(|_| expanded)
                    .map(str::to_string),
            }
        })
        .collect()
}

pub fn controls(
    presenter: &ResponsePresenter,
    channel: ChannelStatus,
    loading: bool,
    current_action: Option<ActionId>,
) -> Controls {
    let selected = |action| current_action == Some(action);
    let displayable = presenter.has_displayable_content();
    let reactions = presenter.reactions();

    Controls {
        hint: ControlState::new(!loading, selected(ActionId::Hint)),
        next_step: ControlState::new(!loading, selected(ActionId::NextStep)),
        final_verification: ControlState::new(!loading, selected(ActionId::FinalVerification)),
        copy: ControlState::new(displayable, reactions.copied),
        like: ControlState::new(displayable, reactions.liked),
        dislike: ControlState::new(displayable, reactions.disliked),
        mute: ControlState::new(true, channel.is_muted),
        play_pause: ControlState::new(channel.is_busy(), channel.is_paused),
    }
}
