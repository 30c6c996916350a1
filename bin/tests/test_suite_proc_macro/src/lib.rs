use quote::{format_ident, quote};

/// Expands to one `#[test]` per `.loxpr` fixture under `bin/tests/suite`, each handing the
/// fixture's source to `loxpr_expect`.
#[proc_macro]
pub fn generate_tests(_: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let root_dir = format!("{}/../suite", env!("CARGO_MANIFEST_DIR"));
    let mut fixtures = walkdir::WalkDir::new(root_dir.clone())
        .sort_by_file_name()
        .into_iter()
        .flatten()
        .filter(|entry| entry.path().extension() == Some("loxpr".as_ref()))
        .peekable();

    if fixtures.peek().is_none() {
        panic!("No .loxpr fixtures found in {root_dir}");
    }

    let tests = fixtures.map(|entry| {
        let test_file_path = entry.path().to_string_lossy().to_string();
        let relative_test_path = entry.path().strip_prefix(&root_dir).unwrap().to_string_lossy();
        let test_ident = format_ident!(
            "test_{}",
            relative_test_path.replace(['/', '\\'], "_").replace(".loxpr", "")
        );
        quote! {
            #[test]
            fn #test_ident() {
                loxpr_expect(std::fs::read_to_string(#test_file_path).unwrap().as_str());
            }
        }
    });

    quote! {
        #[ctor::ctor]
        fn init() {
            let _ = env_logger::builder().is_test(true).try_init();
        }

        #(#tests)*
    }
    .into()
}
