//! Binary encode/decode for saved timelines.
//!
//! All integers and floats are little-endian. Counts are `u32`. Records
//! are a tag byte followed by the shared header fields and the variant's
//! payload:
//!
//! ```text
//! [tag u8] [player u32] [copy u32] [ap_start u32] [ap_cost u32] [payload]
//! ```
//!
//! Spawn payloads hold the spawn position; move, attack and push payloads
//! hold the direction; empty records carry no payload.

use std::io::{Read, Write};

use rewind_core::{
    ActionKind, ActionRecord, CopyId, Cursors, PlayerId, Rules, Timeline, Turn, Vec3,
};

use crate::error::StoreError;
use crate::{FORMAT_VERSION, MAGIC};

/// Record tag: spawn.
pub const TAG_SPAWN: u8 = 0;
/// Record tag: empty filler.
pub const TAG_EMPTY: u8 = 1;
/// Record tag: move.
pub const TAG_MOVE: u8 = 2;
/// Record tag: attack.
pub const TAG_ATTACK: u8 = 3;
/// Record tag: push.
pub const TAG_PUSH: u8 = 4;

// Upper bound on speculative allocation from an untrusted count.
const MAX_PREALLOC: usize = 1024;

// ── Primitive writers ───────────────────────────────────────────

/// Write a single byte.
pub fn write_u8(w: &mut dyn Write, v: u8) -> Result<(), StoreError> {
    w.write_all(&[v])?;
    Ok(())
}

/// Write a little-endian u32.
pub fn write_u32_le(w: &mut dyn Write, v: u32) -> Result<(), StoreError> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

/// Write a little-endian f32.
pub fn write_f32_le(w: &mut dyn Write, v: f32) -> Result<(), StoreError> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

/// Write a vector as three little-endian f32s.
pub fn write_vec3(w: &mut dyn Write, v: Vec3) -> Result<(), StoreError> {
    write_f32_le(w, v.x)?;
    write_f32_le(w, v.y)?;
    write_f32_le(w, v.z)
}

// ── Primitive readers ───────────────────────────────────────────

/// Read a single byte.
pub fn read_u8(r: &mut dyn Read) -> Result<u8, StoreError> {
    let mut buf = [0u8; 1];
    r.read_exact(&mut buf)?;
    Ok(buf[0])
}

/// Read a little-endian u32.
pub fn read_u32_le(r: &mut dyn Read) -> Result<u32, StoreError> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

/// Read a little-endian f32.
pub fn read_f32_le(r: &mut dyn Read) -> Result<f32, StoreError> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(f32::from_le_bytes(buf))
}

/// Read a vector of three little-endian f32s.
pub fn read_vec3(r: &mut dyn Read) -> Result<Vec3, StoreError> {
    Ok(Vec3::new(read_f32_le(r)?, read_f32_le(r)?, read_f32_le(r)?))
}

// ── Header ──────────────────────────────────────────────────────

/// Encode magic, version and the rules descriptor.
pub fn encode_header(w: &mut dyn Write, rules: &Rules) -> Result<(), StoreError> {
    w.write_all(&MAGIC)?;
    write_u8(w, FORMAT_VERSION)?;
    encode_rules(w, rules)
}

/// Decode and check magic and version, then decode the rules descriptor.
///
/// The rules are returned unvalidated.
pub fn decode_header(r: &mut dyn Read) -> Result<Rules, StoreError> {
    let mut magic = [0u8; 4];
    r.read_exact(&mut magic)?;
    if magic != MAGIC {
        return Err(StoreError::InvalidMagic);
    }
    let version = read_u8(r)?;
    if version != FORMAT_VERSION {
        return Err(StoreError::UnsupportedVersion { found: version });
    }
    decode_rules(r)
}

/// Encode every field of the rules.
pub fn encode_rules(w: &mut dyn Write, rules: &Rules) -> Result<(), StoreError> {
    write_f32_le(w, rules.grid_step)?;
    for v in [
        rules.ap_per_move,
        rules.ap_per_attack,
        rules.ap_per_push,
        rules.ap_per_turn,
        rules.flashback_turns,
        rules.flashback_zone,
        rules.turns_per_flashback,
        rules.initial_flashback_charges,
    ] {
        write_u32_le(w, v)?;
    }
    Ok(())
}

/// Decode the rules descriptor.
pub fn decode_rules(r: &mut dyn Read) -> Result<Rules, StoreError> {
    Ok(Rules {
        grid_step: read_f32_le(r)?,
        ap_per_move: read_u32_le(r)?,
        ap_per_attack: read_u32_le(r)?,
        ap_per_push: read_u32_le(r)?,
        ap_per_turn: read_u32_le(r)?,
        flashback_turns: read_u32_le(r)?,
        flashback_zone: read_u32_le(r)?,
        turns_per_flashback: read_u32_le(r)?,
        initial_flashback_charges: read_u32_le(r)?,
    })
}

// ── Cursors ─────────────────────────────────────────────────────

/// Encode the scalar cursors.
pub fn encode_cursors(w: &mut dyn Write, c: &Cursors) -> Result<(), StoreError> {
    write_u32_le(w, c.current_turn)?;
    write_u32_le(w, c.current_top_turn)?;
    write_u32_le(w, c.current_player.0)?;
    write_u32_le(w, c.current_copy.0)?;
    write_u32_le(w, c.action_points_left)?;
    write_u32_le(w, c.flashback_charges)
}

/// Decode the scalar cursors.
pub fn decode_cursors(r: &mut dyn Read) -> Result<Cursors, StoreError> {
    Ok(Cursors {
        current_turn: read_u32_le(r)?,
        current_top_turn: read_u32_le(r)?,
        current_player: PlayerId(read_u32_le(r)?),
        current_copy: CopyId(read_u32_le(r)?),
        action_points_left: read_u32_le(r)?,
        flashback_charges: read_u32_le(r)?,
    })
}

// ── Records ─────────────────────────────────────────────────────

/// Encode one action record.
pub fn encode_record(w: &mut dyn Write, rec: &ActionRecord) -> Result<(), StoreError> {
    let tag = match rec.kind {
        ActionKind::Spawn { .. } => TAG_SPAWN,
        ActionKind::Empty => TAG_EMPTY,
        ActionKind::Move { .. } => TAG_MOVE,
        ActionKind::Attack { .. } => TAG_ATTACK,
        ActionKind::Push { .. } => TAG_PUSH,
    };
    write_u8(w, tag)?;
    write_u32_le(w, rec.player.0)?;
    write_u32_le(w, rec.copy.0)?;
    write_u32_le(w, rec.ap_start)?;
    write_u32_le(w, rec.ap_cost)?;
    match rec.kind {
        ActionKind::Spawn { from } => write_vec3(w, from)?,
        ActionKind::Empty => {}
        ActionKind::Move { direction }
        | ActionKind::Attack { direction }
        | ActionKind::Push { direction } => write_vec3(w, direction)?,
    }
    Ok(())
}

/// Decode one action record.
pub fn decode_record(r: &mut dyn Read) -> Result<ActionRecord, StoreError> {
    let tag = read_u8(r)?;
    if tag > TAG_PUSH {
        return Err(StoreError::UnknownRecordTag { tag });
    }
    let player = PlayerId(read_u32_le(r)?);
    let copy = CopyId(read_u32_le(r)?);
    let ap_start = read_u32_le(r)?;
    let ap_cost = read_u32_le(r)?;
    let kind = match tag {
        TAG_SPAWN => ActionKind::Spawn { from: read_vec3(r)? },
        TAG_EMPTY => ActionKind::Empty,
        TAG_MOVE => ActionKind::Move {
            direction: read_vec3(r)?,
        },
        TAG_ATTACK => ActionKind::Attack {
            direction: read_vec3(r)?,
        },
        _ => ActionKind::Push {
            direction: read_vec3(r)?,
        },
    };
    Ok(ActionRecord {
        player,
        copy,
        ap_start,
        ap_cost,
        kind,
    })
}

// ── Timeline ────────────────────────────────────────────────────

/// Encode cursors and every turn of the log.
pub fn encode_timeline(w: &mut dyn Write, timeline: &Timeline) -> Result<(), StoreError> {
    encode_cursors(w, timeline.cursors())?;
    write_u32_le(w, timeline.turn_count())?;
    for turn in timeline.turns() {
        write_u32_le(w, turn.len() as u32)?;
        for rec in turn.records() {
            encode_record(w, rec)?;
        }
    }
    Ok(())
}

/// Decode cursors and turns. The result is not validated.
pub fn decode_timeline(r: &mut dyn Read) -> Result<Timeline, StoreError> {
    let cursors = decode_cursors(r)?;
    let turn_count = read_u32_le(r)? as usize;
    let mut turns = Vec::with_capacity(turn_count.min(MAX_PREALLOC));
    for t in 0..turn_count {
        let record_count = read_u32_le(r)? as usize;
        let mut records = Vec::with_capacity(record_count.min(MAX_PREALLOC));
        for i in 0..record_count {
            let rec = decode_record(r).map_err(|e| match e {
                StoreError::Io(io) if io.kind() == std::io::ErrorKind::UnexpectedEof => {
                    StoreError::MalformedRecord {
                        detail: format!("truncated record {i} of turn {t}"),
                    }
                }
                other => other,
            })?;
            records.push(rec);
        }
        turns.push(Turn::from_records(records));
    }
    Ok(Timeline::from_parts(turns, cursors))
}

/// Fail unless the stream is exhausted.
pub fn expect_eof(r: &mut dyn Read) -> Result<(), StoreError> {
    let mut probe = [0u8; 1];
    loop {
        match r.read(&mut probe) {
            Ok(0) => return Ok(()),
            Ok(_) => {
                return Err(StoreError::MalformedRecord {
                    detail: "trailing bytes after last turn".into(),
                })
            }
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(StoreError::Io(e)),
        }
    }
}
