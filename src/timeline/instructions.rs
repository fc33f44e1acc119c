use crate::{
    foundation::error::ReelResult,
    scene::dsl::{Play, SegmentKind},
};

/// One entry of the presentation's playback script.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Instruction {
    SegmentBegin {
        index: usize,
        kind: SegmentKind,
    },
    Play {
        /// Names of the animated objects, in animation order.
        targets: Vec<String>,
        play: Play,
        frames: u64,
    },
    Wait {
        secs: f64,
        frames: u64,
    },
    SegmentEnd {
        index: usize,
        kind: SegmentKind,
    },
}

/// Consumer of the instruction stream.
pub trait InstructionSink {
    fn accept(&mut self, instruction: Instruction) -> ReelResult<()>;
}

/// Keeps every instruction, for plan dumps and tests.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub instructions: Vec<Instruction>,
}

impl InstructionSink for RecordingSink {
    fn accept(&mut self, instruction: Instruction) -> ReelResult<()> {
        self.instructions.push(instruction);
        Ok(())
    }
}

/// Logs each instruction at debug level and forwards nothing.
#[derive(Debug, Default)]
pub struct TracingSink {
    pub frames: u64,
}

impl InstructionSink for TracingSink {
    fn accept(&mut self, instruction: Instruction) -> ReelResult<()> {
        match &instruction {
            Instruction::Play {
                targets, frames, ..
            } => {
                tracing::debug!(?targets, frames, "play");
                self.frames += frames;
            }
            Instruction::Wait { secs, frames } => {
                tracing::debug!(secs, frames, "wait");
                self.frames += frames;
            }
            Instruction::SegmentBegin { kind, .. } | Instruction::SegmentEnd { kind, .. } => {
                tracing::debug!(segment = kind.name(), "segment boundary");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/instructions.rs"]
mod tests;
