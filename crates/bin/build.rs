use std::process::Command;

fn main() {
    println!("cargo:rerun-if-changed=../client/Cargo.toml");
    println!("cargo:rerun-if-changed=../client/src");
    println!("cargo:rerun-if-changed=../client/web/index.html");

    // Run wasm-pack like a manual client build would, with a separate target
    // dir to avoid the outer build's file lock. Without wasm-pack the host
    // still builds and serves whatever is already in web/.
    let mut cmd = Command::new("wasm-pack");
    cmd.args(["build", "--target", "web", "--out-dir", "./web/pkg", "--target-dir", "../../target/wasm"])
       .current_dir("../client");

    match cmd.status() {
        Ok(status) if status.success() => {
            println!("cargo:warning=WASM client built - assets will be embedded");
        }
        Ok(status) => {
            println!("cargo:warning=WASM client build failed ({status}); embedding existing assets");
        }
        Err(e) => {
            println!("cargo:warning=wasm-pack not available ({e}); embedding existing assets");
        }
    }
}
