//! Dispatch-loop tracing. One `trace!` per fetched instruction, `debug!` on
//! frame push/pop and continuation capture/resumption.

use crate::instruction::Instruction;

pub(super) fn trace_dispatch(inst: &Instruction, pc: i64) {
    tracing::trace!(pc, ?inst, "dispatch");
}

pub(super) fn trace_frame_pop(pc: i64) {
    tracing::debug!(pc, "frame exhausted, popping");
}

pub(super) fn trace_frame_push(pc: i64) {
    tracing::debug!(pc, "non-tail call, pushing frame");
}

pub(super) fn trace_tail_call(pc: i64) {
    tracing::debug!(pc, "tail call, reusing frame");
}

pub(super) fn trace_continuation_captured(pc: i64) {
    tracing::debug!(pc, "continuation captured");
}

pub(super) fn trace_continuation_resumed(pc: i64) {
    tracing::debug!(pc, "continuation resumed");
}
