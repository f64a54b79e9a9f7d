// SPDX-License-Identifier: GPL-3.0-or-later

//! Copies a generated `memory.x` into the linker search path, mirroring
//! `stage-a`'s build script. Stage-B's own vector table starts at
//! `OWN_VECTOR_TABLE_BASE` — the same address stage-A verified and
//! jumped to.

use std::env;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

/// Must track `consts::OWN_VECTOR_TABLE_BASE`; kept as a plain literal
/// here (rather than importing `src/consts.rs`) because that module
/// also references the `rtcore` crate, which build scripts don't link
/// against.
const OWN_VECTOR_TABLE_BASE: u32 = 0x0800_2000;

fn main() {
    let memory_x_content = format!(
        r##"
        MEMORY
        {{
            /* NOTE 1 K = 1 KiBi = 1024 bytes */
            FLASH : ORIGIN = {:#X}, LENGTH = 48K
            RAM : ORIGIN = 0x20000000, LENGTH = 20K
        }}
        "##,
        OWN_VECTOR_TABLE_BASE
    );

    let out = &PathBuf::from(env::var_os("OUT_DIR").unwrap());
    File::create(out.join("memory.x")).unwrap().write_all(memory_x_content.as_bytes()).unwrap();
    println!("cargo:rustc-link-search={}", out.display());
    println!("cargo:rerun-if-changed=src/consts.rs");

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
}
