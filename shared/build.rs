fn main() {
    uniffi::generate_scaffolding("./src/shared.udl").unwrap();
}
