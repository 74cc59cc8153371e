//! Scripted session replay.
//!
//! A script is a JSON array of steps, each tagged by `step`:
//!
//! ```json
//! [
//!   { "step": "tool", "tool": "select" },
//!   { "step": "pointerDown", "x": 120, "y": 200 },
//!   { "step": "pointerMove", "x": 160, "y": 240 },
//!   { "step": "pointerUp" },
//!   { "step": "command", "command": "duplicate" }
//! ]
//! ```
//!
//! Pointer coordinates are in screen space.

use crate::{AppError, AppResult};
use kurbo::Point;
use lovart_core::{
    Command, Editor, ElementId, GeneratedContent, InteractionOutcome, Modifiers, PointerInput,
    PointerTarget, ResizeHandle, ToolKind,
};
use serde::Deserialize;

/// One replayed user action.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "step", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ScriptStep {
    PointerDown {
        x: f64,
        y: f64,
        #[serde(default)]
        modifiers: Modifiers,
        /// Press this element directly instead of hit testing.
        #[serde(default)]
        element: Option<ElementId>,
        /// With `element`, press one of its resize handles.
        #[serde(default)]
        handle: Option<ResizeHandle>,
    },
    PointerMove {
        x: f64,
        y: f64,
        #[serde(default)]
        modifiers: Modifiers,
    },
    PointerUp,
    Key {
        key: String,
    },
    Command {
        command: Command,
    },
    Tool {
        tool: ToolKind,
    },
    Generated {
        #[serde(default)]
        target: Option<ElementId>,
        content: GeneratedContent,
    },
    ConnectFlow {
        source: ElementId,
    },
}

/// Summary of a replayed script.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptReport {
    pub steps: usize,
    /// Steps that changed something.
    pub effective: usize,
}

/// Parse a script from JSON.
pub fn parse_script(json: &str) -> AppResult<Vec<ScriptStep>> {
    serde_json::from_str(json).map_err(|e| AppError::Script(e.to_string()))
}

/// Replay `steps` against the editor. Debounced history is flushed at the end.
pub fn run_script(editor: &mut Editor, steps: &[ScriptStep]) -> AppResult<ScriptReport> {
    let mut report = ScriptReport::default();
    for (index, step) in steps.iter().enumerate() {
        let changed = run_step(editor, step)
            .map_err(|e| AppError::Script(format!("step {index}: {e}")))?;
        log::debug!("Step {index} {step:?} changed={changed}");
        report.steps += 1;
        if changed {
            report.effective += 1;
        }
    }
    editor.flush_history();
    log::info!(
        "Replayed {} steps ({} effective)",
        report.steps,
        report.effective
    );
    Ok(report)
}

fn pointer(x: f64, y: f64, modifiers: Modifiers) -> PointerInput {
    PointerInput {
        modifiers,
        ..PointerInput::at(Point::new(x, y))
    }
}

fn run_step(editor: &mut Editor, step: &ScriptStep) -> AppResult<bool> {
    let changed = match step {
        ScriptStep::PointerDown {
            x,
            y,
            modifiers,
            element,
            handle,
        } => {
            let input = pointer(*x, *y, *modifiers);
            let outcome = match (element, handle) {
                (Some(id), Some(handle)) => editor.pointer_down_on(PointerTarget::Handle(*id, *handle), input),
                (Some(id), None) => editor.pointer_down_on(PointerTarget::Element(*id), input),
                (None, _) => editor.pointer_down(input),
            };
            outcome != InteractionOutcome::None
        }
        ScriptStep::PointerMove { x, y, modifiers } => {
            editor.pointer_move(pointer(*x, *y, *modifiers)) != InteractionOutcome::None
        }
        ScriptStep::PointerUp => editor.pointer_up() != InteractionOutcome::None,
        ScriptStep::Key { key } => editor.handle_key(key),
        ScriptStep::Command { command } => editor.execute(*command),
        ScriptStep::Tool { tool } => {
            editor.set_tool(*tool);
            true
        }
        ScriptStep::Generated { target, content } => {
            editor.accept_generated_content(*target, content.clone())?;
            true
        }
        ScriptStep::ConnectFlow { source } => {
            editor.connect_flow(*source)?;
            true
        }
    };
    Ok(changed)
}
