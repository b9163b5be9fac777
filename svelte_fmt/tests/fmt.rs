use insta::{Settings, assert_snapshot, glob};
use std::{borrow::Cow, collections::HashMap, fs, path::Path};
use svelte_fmt::{FormatError, SyntaxErrorKind, config::FormatOptions, format_text};

#[test]
fn fmt_snapshot() {
    glob!("fmt/**/*.svelte", |path| {
        let input = fs::read_to_string(path).unwrap();

        let options = fs::read_to_string(path.with_file_name("config.toml"))
            .map(|config_file| {
                toml::from_str::<HashMap<String, FormatOptions>>(&config_file).unwrap()
            })
            .ok();

        if let Some(options) = options {
            options.into_iter().for_each(|(option_name, options)| {
                let output = run_format_test(path, &input, &options);
                build_settings(path).bind(|| {
                    let name = path.file_stem().unwrap().to_str().unwrap();
                    assert_snapshot!(format!("{name}.{option_name}"), output);
                });
            })
        } else {
            let output = run_format_test(path, &input, &Default::default());
            build_settings(path).bind(|| {
                let name = path.file_stem().unwrap().to_str().unwrap();
                assert_snapshot!(name, output);
            });
        }
    });
}

fn run_format_test(path: &Path, input: &str, options: &FormatOptions) -> String {
    let output = format_text(input, options, |code, _| Ok::<_, ()>(code.into()))
        .map_err(|err| format!("failed to format '{}': {:?}", path.display(), err))
        .unwrap();
    let regression_format = format_text(&output, options, |code, _| Ok::<_, ()>(code.into()))
        .map_err(|err| {
            format!(
                "syntax error in stability test '{}': {:?}",
                path.display(),
                err
            )
        })
        .unwrap();
    similar_asserts::assert_eq!(
        output,
        regression_format,
        "'{}' format is unstable",
        path.display()
    );

    output
}

fn build_settings(path: &Path) -> Settings {
    let mut settings = Settings::clone_current();
    settings.set_snapshot_path(path.parent().unwrap());
    settings.remove_snapshot_suffix();
    settings.set_prepend_module_to_snapshot(false);
    settings.remove_input_file();
    settings.set_omit_expression(true);
    settings.remove_info();
    settings
}

#[test]
fn external_formatter() {
    let code = "<script>\nlet   a=1\n</script>\n<p>{  a+1  }</p>\n<style>\np{}\n</style>";
    let formatted = format_text(code, &Default::default(), |code, hints| {
        Ok::<_, anyhow::Error>(match hints.ext {
            "css" => Cow::from("p {\n}\n"),
            "js" if hints.kind == svelte_fmt::EmbedKind::Script => Cow::from("let a = 1;\n"),
            _ => Cow::from(code.replace(' ', "").replace('+', " + ")),
        })
    })
    .unwrap();
    assert_eq!(
        formatted,
        "<script>\nlet a = 1;\n</script>\n<p>{a + 1}</p>\n\n<style>\np {\n}\n</style>\n"
    );
}

#[test]
fn external_formatter_errors() {
    let code = "<script>\nlet a = ;\n</script>\n<p>{a}</p>\n<style>\np {\n</style>";
    let error = format_text(code, &Default::default(), |code, hints| {
        if hints.kind == svelte_fmt::EmbedKind::Expression {
            Ok(code.into())
        } else {
            Err(anyhow::anyhow!("cannot format {}", hints.ext))
        }
    })
    .unwrap_err();
    let FormatError::External(errors) = error else {
        panic!("expected external formatter errors: {error:?}");
    };
    let messages = errors.iter().map(ToString::to_string).collect::<Vec<_>>();
    assert_eq!(messages, ["cannot format js", "cannot format css"]);
}

#[test]
fn syntax_error_points_at_input() {
    let code = "<style>\n  p {}\n</style>\n<p>a</p>\n{:else}";
    let error = format_text(code, &Default::default(), |code, _| {
        Ok::<_, ()>(code.into())
    })
    .unwrap_err();
    let FormatError::Syntax(error) = error else {
        panic!("expected syntax error: {error:?}");
    };
    assert!(matches!(error.kind, SyntaxErrorKind::UnknownSvelteBlock));
    assert_eq!(error.pos, code.find("{:else}").unwrap());
    assert_eq!((error.line, error.column), (5, 1));
}
