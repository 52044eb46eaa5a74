use std::env;

fn main() {
    println!("cargo:rerun-if-env-changed=SP1_VERIFIER_LIB_DIR");
    if env::var("CARGO_FEATURE_SP1").is_err() {
        return;
    }

    let lib_dir = env::var("SP1_VERIFIER_LIB_DIR").unwrap_or_else(|_| "lib".to_owned());
    println!("cargo:rustc-link-search=native={lib_dir}");
    println!("cargo:rustc-link-lib=static=sp1_verifier");

    if env::var("CARGO_CFG_TARGET_OS").as_deref() == Ok("linux") {
        for lib in ["dl", "rt", "m"] {
            println!("cargo:rustc-link-lib={lib}");
        }
    }
}
