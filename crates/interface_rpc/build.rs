use std::env;
use std::path::PathBuf;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Use the bundled protoc so builds do not depend on a system install
    env::set_var("PROTOC", protoc_bin_vendored::protoc_bin_path()?);

    let out_dir = PathBuf::from(env::var("OUT_DIR")?);
    let well_known = protoc_bin_vendored::include_path()?;

    tonic_build::configure()
        .build_client(false)
        .file_descriptor_set_path(out_dir.join("eventhub_descriptor.bin"))
        .compile_protos(&["proto/eventhub.proto"], &[PathBuf::from("proto"), well_known])?;

    println!("cargo:rerun-if-changed=proto/eventhub.proto");
    Ok(())
}
