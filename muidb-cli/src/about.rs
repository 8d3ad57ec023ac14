use indoc::indoc;

const ABOUT: &str = indoc! {"
    muidb: multilingual translation database

    Aggregates RESX and XLIFF sources into one .muidb file per project,
    tracks a review state for every text and projects the database back
    into one RESX file per language.

    Distributed under the MIT license. Permission is hereby granted, free of
    charge, to any person obtaining a copy of this software and associated
    documentation files, to deal in the software without restriction,
    subject to the conditions stated in the LICENSE file.

    XML handling by quick-xml. Command-line parsing by clap.
"};

pub fn about_text() -> String {
    format!("{}\nVersion {}", ABOUT, env!("CARGO_PKG_VERSION"))
}

pub fn print_about() {
    println!("{}", about_text());
}
