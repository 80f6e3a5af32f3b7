//! Motion summary
//!
//! The rig treats each row as an absolute target and moves every motor by
//! the difference to the previous row, starting from zero. This module
//! works out those relative moves without touching hardware.

use crate::error::{TableError, TableResult};
use crate::table::CommandTable;
use gmslicer_core::{Axis, MotorCommandRow};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

/// Relative step counts for one row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct StepDelta {
    /// X stage move
    pub x: i64,
    /// Y stage move
    pub y: i64,
    /// Z stage move
    pub z: i64,
    /// Inclination motor move
    pub theta: i64,
    /// Azimuth motor move
    pub phi: i64,
}

impl StepDelta {
    // `row` is the 1-based data row, used only for error reporting
    fn between(row: usize, from: &MotorCommandRow, to: &MotorCommandRow) -> TableResult<Self> {
        let delta = |axis: Axis| {
            to.get(axis)
                .checked_sub(from.get(axis))
                .ok_or(TableError::MotionOverflow { row, axis })
        };
        Ok(Self {
            x: delta(Axis::X)?,
            y: delta(Axis::Y)?,
            z: delta(Axis::Z)?,
            theta: delta(Axis::Theta)?,
            phi: delta(Axis::Phi)?,
        })
    }

    /// Delta on one axis
    pub fn get(&self, axis: Axis) -> i64 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
            Axis::Theta => self.theta,
            Axis::Phi => self.phi,
        }
    }
}

/// Per-axis totals of absolute steps travelled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct AxisTotals {
    /// X stage steps
    pub x: u64,
    /// Y stage steps
    pub y: u64,
    /// Z stage steps
    pub z: u64,
    /// Inclination motor steps
    pub theta: u64,
    /// Azimuth motor steps
    pub phi: u64,
}

impl AxisTotals {
    /// Total on one axis
    pub fn get(&self, axis: Axis) -> u64 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
            Axis::Theta => self.theta,
            Axis::Phi => self.phi,
        }
    }

    fn get_mut(&mut self, axis: Axis) -> &mut u64 {
        match axis {
            Axis::X => &mut self.x,
            Axis::Y => &mut self.y,
            Axis::Z => &mut self.z,
            Axis::Theta => &mut self.theta,
            Axis::Phi => &mut self.phi,
        }
    }

    fn add(&mut self, row: usize, delta: &StepDelta) -> TableResult<()> {
        for axis in Axis::ALL {
            let total = self.get_mut(axis);
            *total = total
                .checked_add(delta.get(axis).unsigned_abs())
                .ok_or(TableError::MotionOverflow { row, axis })?;
        }
        Ok(())
    }
}

/// What executing a command table would do
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct MotionSummary {
    /// Relative move for every row, starting from zero
    pub deltas: Vec<StepDelta>,
    /// Absolute steps travelled per axis
    pub total_steps: AxisTotals,
    /// Distinct Z targets visited
    pub layer_count: usize,
    /// Number of rows
    pub row_count: usize,
}

impl MotionSummary {
    /// Summarize a command table
    pub fn from_table(table: &CommandTable) -> TableResult<Self> {
        Self::from_rows(table.rows())
    }

    /// Summarize rows in execution order
    ///
    /// Fails with [`TableError::MotionOverflow`] when a move or a running
    /// total does not fit in 64 bits.
    pub fn from_rows(rows: &[MotorCommandRow]) -> TableResult<Self> {
        let mut summary = Self {
            row_count: rows.len(),
            ..Self::default()
        };

        let mut previous = MotorCommandRow::default();
        let mut layers = BTreeSet::new();
        for (index, row) in rows.iter().enumerate() {
            let delta = StepDelta::between(index + 1, &previous, row)?;
            summary.total_steps.add(index + 1, &delta)?;
            summary.deltas.push(delta);
            layers.insert(row.z);
            previous = *row;
        }
        summary.layer_count = layers.len();
        Ok(summary)
    }
}

impl fmt::Display for MotionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Rows:   {}", self.row_count)?;
        writeln!(f, "Layers: {}", self.layer_count)?;
        writeln!(f, "Total steps:")?;
        for axis in Axis::ALL {
            writeln!(f, "  {:<6} {}", axis.to_string(), self.total_steps.get(axis))?;
        }
        Ok(())
    }
}
