//! Static text placed at the top of every generated file.

/// License block shared by all generated files.
pub const LICENSE_PREFIX: &[&str] = &[
    "/*",
    "** Copyright (c) 2024 The layergen contributors",
    "**",
    "** Permission is hereby granted, free of charge, to any person obtaining a",
    "** copy of this software and associated documentation files (the \"Software\"),",
    "** to deal in the Software without restriction, including without limitation",
    "** the rights to use, copy, modify, merge, publish, distribute, sublicense,",
    "** and/or sell copies of the Software, and to permit persons to whom the",
    "** Software is furnished to do so, subject to the following conditions:",
    "**",
    "** The above copyright notice and this permission notice shall be included in",
    "** all copies or substantial portions of the Software.",
    "**",
    "** THE SOFTWARE IS PROVIDED \"AS IS\", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR",
    "** IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,",
    "** FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE",
    "** AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER",
    "** LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING",
    "** FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER",
    "** DEALINGS IN THE SOFTWARE.",
    "*/",
    "",
];

/// Notice for files generated from the Vulkan registry.
pub const VULKAN_PREFIX: &[&str] = &[
    "/*",
    "** This file is generated from the Khronos Vulkan XML API Registry.",
    "**",
    "*/",
    "",
];

/// License block followed by a target-specific preamble.
#[must_use]
pub fn prefix_lines(target_prefix: &[&str]) -> Vec<String> {
    LICENSE_PREFIX
        .iter()
        .chain(target_prefix)
        .map(|s| s.to_string())
        .collect()
}
