//! Lookup tables from integer codes to human-readable names.
//!
//! The simulation writes end conditions and error records as integers.  The
//! [`CodeTable`] trait is the seam through which the analytics resolve them;
//! [`StandardCodes`] carries the fixed enumerations shipped with the
//! simulation code.  Error-message and module codes are 1-based, 0 meaning
//! "no error".

use crate::{EndCond, MrkError, MrkResult};

/// Resolves end-condition and error codes to names.
///
/// Implementations must return [`MrkError::UnknownCode`] for codes outside
/// their table rather than a placeholder.
pub trait CodeTable {
    /// Name of an end-condition code.  Code 0 is `"none"`.
    fn endcond_name(&self, code: EndCond) -> MrkResult<String>;

    /// Text of a 1-based error-message code.
    fn error_message(&self, code: u32) -> MrkResult<&str>;

    /// Source module of a 1-based error-module code.
    fn error_module(&self, code: u32) -> MrkResult<&str>;
}

const ERROR_MESSAGES: [&str; 7] = [
    "Input evaluation failed",
    "Unknown input type",
    "Unphysical quantity when evaluating input",
    "Unphysical marker quantity",
    "Time step too small/zero/NaN",
    "Wiener array is full or inconsistent",
    "Unphysical result when integrating marker coordinates",
];

const ERROR_MODULES: [&str; 22] = [
    "mccc_wiener.c",
    "mccc_push.c",
    "mccc.c",
    "step_fo_vpa.c",
    "step_gc_cashkarp.c",
    "step_gc_rk4",
    "N0_3D.c",
    "N0_ST.c",
    "B_2DS.c",
    "B_2DS.c",
    "B_STS.c",
    "B_GS.c",
    "plasma_1D.c",
    "plasma_1DS.c",
    "plasma.c",
    "E_field.c",
    "neutral.c",
    "E_1DS.c",
    "B_field.c",
    "particle.c",
    "boozer.c",
    "mhd.c",
];

/// The fixed code tables of the simulation.
#[derive(Copy, Clone, Debug, Default)]
pub struct StandardCodes;

impl StandardCodes {
    fn lookup(table: &'static str, entries: &'static [&'static str], code: u32) -> MrkResult<&'static str> {
        (code as usize)
            .checked_sub(1)
            .and_then(|i| entries.get(i))
            .copied()
            .ok_or(MrkError::UnknownCode { table, code })
    }
}

impl CodeTable for StandardCodes {
    fn endcond_name(&self, code: EndCond) -> MrkResult<String> {
        if code.is_none() {
            return Ok("none".to_owned());
        }
        if !code.is_known() {
            return Err(MrkError::UnknownCode { table: "endcond", code: code.0 });
        }
        let names: Vec<&str> = code.flags().map(|(_, name)| name).collect();
        Ok(names.join(" and "))
    }

    fn error_message(&self, code: u32) -> MrkResult<&str> {
        Self::lookup("error message", &ERROR_MESSAGES, code)
    }

    fn error_module(&self, code: u32) -> MrkResult<&str> {
        Self::lookup("error module", &ERROR_MODULES, code)
    }
}
