// SPDX-License-Identifier: GPL-3.0-or-later

//! Copies a generated `memory.x` into the linker search path, the way
//! the workspace's binaries all do when `cortex-m-rt` needs a layout
//! it can't discover from the crate root on its own in a workspace
//! build.

use std::env;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

#[path = "src/consts.rs"]
mod consts;

fn main() {
    let memory_x_content = format!(
        r##"
        MEMORY
        {{
            /* NOTE 1 K = 1 KiBi = 1024 bytes */
            /* Stage-A occupies the first 8K of flash; the verified
               application image starts at APPLICATION_ADDRESS. */
            FLASH : ORIGIN = 0x08000000, LENGTH = {:#X}
            RAM : ORIGIN = 0x20000000, LENGTH = 20K
        }}
        "##,
        consts::APPLICATION_ADDRESS
    );

    let out = &PathBuf::from(env::var_os("OUT_DIR").unwrap());
    File::create(out.join("memory.x")).unwrap().write_all(memory_x_content.as_bytes()).unwrap();
    println!("cargo:rustc-link-search={}", out.display());
    println!("cargo:rerun-if-changed=src/consts.rs");

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
}
