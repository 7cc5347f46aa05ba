#[cfg(windows)]
fn main() {
    // Embed the app icon resource when one is present.
    let rc_path = std::path::Path::new("resources/app.rc");
    if rc_path.exists() {
        embed_resource::compile("resources/app.rc", embed_resource::NONE);
    }
}

#[cfg(not(windows))]
fn main() {}
