//! Build script for generating the rkt v1alpha protobuf bindings
//!
//! Code generation only runs with the `proto-gen` feature, which also pulls in
//! tonic-build. Without it the crate uses the hand-maintained bindings in
//! `src/proto`. If protoc is not available, generation is skipped with a
//! warning.

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=../../proto/rkt/v1alpha/api.proto");

    #[cfg(feature = "proto-gen")]
    generate()?;

    Ok(())
}

#[cfg(feature = "proto-gen")]
fn generate() -> Result<(), Box<dyn std::error::Error>> {
    use std::path::PathBuf;
    use std::process::Command;

    let protoc_available =
        std::env::var("PROTOC").is_ok() || Command::new("protoc").arg("--version").output().is_ok();

    if !protoc_available {
        println!("cargo:warning=protoc not found, skipping proto generation");
        println!("cargo:warning=Install protoc or set PROTOC env var to generate proto code");
        return Ok(());
    }

    let out_dir = PathBuf::from(std::env::var("OUT_DIR")?);

    // The collector only ever talks to a local api-service, never serves one
    tonic_build::configure()
        .build_server(false)
        .build_client(true)
        .out_dir(&out_dir)
        .compile(&["../../proto/rkt/v1alpha/api.proto"], &["../../proto"])?;

    Ok(())
}
