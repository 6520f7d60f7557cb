//! Task action handlers

use crate::state::AppAction;

use super::ActionContext;

/// Handle task-related actions
pub fn handle_task_action(action: AppAction, ctx: &ActionContext) {
    let mut state = ctx.app_state.lock();
    match action {
        AppAction::SetTask(kind) => {
            tracing::info!("Switching to {} task", kind.name());
            state.tasks.request(kind);
        }
        AppAction::SetPoseMode(mode) => {
            tracing::debug!("Pose mode: {}", mode.name());
            state.tasks.pose_mut().mode.set(mode);
        }
        AppAction::ResetPose => {
            let state = &mut *state;
            state.tasks.pose_mut().reset_pose(&mut state.session);
        }
        _ => {}
    }
}
