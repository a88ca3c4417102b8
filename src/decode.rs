//! Frame buffer type code decoding.
//!
//! Type codes reported by the `FBIOGATTR`/`FBIOGTYPE` ioctls are mapped to
//! short mnemonics, translating the `<sys/fbio.h>` macro names thus:
//! - `FBTYPE_SUNxBW` becomes `bwx`
//! - `FBTYPE_SUNxCOLOR` becomes `cgx`
//! - `FBTYPE_SUNxGP` becomes `gpx`
//! - `FBTYPE_NOTSUN[1-9]` becomes `ns[A-J]`

/// Type code of the TCX frame buffer, added after `<sys/fbio.h>` was frozen.
pub const FBTYPE_TCX: i32 = 21;

/// Number of type codes covered by [`DECODE_FB`].
pub const FBTYPE_LASTPLUSONE: usize = 21;

/// Known type codes, indexed by `fb_type`. `None` marks a code without a
/// known mnemonic.
pub const DECODE_FB: [Option<&str>; FBTYPE_LASTPLUSONE] = [
    Some("bw1"),      // FBTYPE_SUN1BW
    Some("cg1"),      // FBTYPE_SUN1COLOR
    Some("bw2"),      // FBTYPE_SUN2BW
    Some("cg2"),      // FBTYPE_SUN2COLOR
    Some("gp2"),      // FBTYPE_SUN2GP
    Some("cg5"),      // FBTYPE_SUN5COLOR
    Some("cg3"),      // FBTYPE_SUN3COLOR
    Some("cg8"),      // FBTYPE_MEMCOLOR
    Some("cg4"),      // FBTYPE_SUN4COLOR
    Some("nsA"),      // FBTYPE_NOTSUN1
    Some("nsB"),      // FBTYPE_NOTSUN2
    Some("nsC"),      // FBTYPE_NOTSUN3
    Some("gx/cg6"),   // FBTYPE_SUNFAST_COLOR
    Some("rop"),      // FBTYPE_SUNROP_COLOR
    Some("vid"),      // FBTYPE_SUNFB_VIDEO
    Some("gifb"),     // FBTYPE_SUNGIFB
    Some("plas"),     // FBTYPE_SUNGPLAS
    Some("gp3/cg12"), // FBTYPE_SUNGP3
    Some("gt"),       // FBTYPE_SUNGT
    Some("leo/zx"),   // FBTYPE_SUNLEO
    Some("mdi/cg14"), // FBTYPE_MDICOLOR
];

/// Vendor-added codes beyond [`FBTYPE_LASTPLUSONE`] that still have a name.
pub const EXTENDED_FB: &[(i32, &str)] = &[(FBTYPE_TCX, "tcx")];

/// Look up the mnemonic for a frame buffer type code.
///
/// # Returns
///
/// - `Some(name)` for a code in [`DECODE_FB`] or [`EXTENDED_FB`]
/// - `None` when the table is stale relative to the driver
#[must_use]
pub fn decode_fb_type(code: i32) -> Option<&'static str> {
    decode_with(&DECODE_FB, EXTENDED_FB, code)
}

/// Table-driven lookup behind [`decode_fb_type`].
///
/// Extended codes are only consulted once `code` falls outside `table`, so a
/// table that grows to cover one takes precedence.
fn decode_with(
    table: &[Option<&'static str>],
    extended: &[(i32, &'static str)],
    code: i32,
) -> Option<&'static str> {
    match usize::try_from(code) {
        Ok(index) if index < table.len() => table[index],
        _ => extended
            .iter()
            .find(|(extended_code, _)| *extended_code == code)
            .map(|(_, name)| *name),
    }
}
