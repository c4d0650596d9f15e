#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

pub mod workspace {
    use std::fs;
    use std::path::{Path, PathBuf};

    use layergen::orchestrator::RunRequest;
    use tempfile::TempDir;

    /// A small registry with one instance, one device and one platform command.
    pub const VK_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<registry>
    <platforms>
        <platform name="xlib" protect="VK_USE_PLATFORM_XLIB_KHR"/>
    </platforms>
    <types>
        <type category="handle"><type>VK_DEFINE_HANDLE</type>(<name>VkInstance</name>)</type>
        <type category="handle"><type>VK_DEFINE_HANDLE</type>(<name>VkDevice</name>)</type>
    </types>
    <enums name="VkResult" type="enum"><enum name="VK_SUCCESS" value="0"/></enums>
    <commands>
        <command><proto><type>VkResult</type> <name>vkCreateInstance</name></proto>
            <param>const <type>VkInstanceCreateInfo</type>* <name>pCreateInfo</name></param></command>
        <command><proto><type>void</type> <name>vkDestroyInstance</name></proto>
            <param><type>VkInstance</type> <name>instance</name></param></command>
        <command><proto><type>void</type> <name>vkDestroyDevice</name></proto>
            <param><type>VkDevice</type> <name>device</name></param></command>
        <command><proto><type>VkResult</type> <name>vkCreateXlibSurfaceKHR</name></proto>
            <param><type>VkInstance</type> <name>instance</name></param></command>
    </commands>
    <feature api="vulkan" name="VK_VERSION_1_0">
        <require>
            <command name="vkCreateInstance"/>
            <command name="vkDestroyInstance"/>
            <command name="vkDestroyDevice"/>
        </require>
    </feature>
    <extensions>
        <extension name="VK_KHR_xlib_surface" supported="vulkan" platform="xlib" type="instance">
            <require><command name="vkCreateXlibSurfaceKHR"/></require>
        </extension>
    </extensions>
</registry>
"#;

    pub const VIDEO_XML: &str = r#"<registry>
    <extensions>
        <extension name="vulkan_video_codec_h264std" supported="vulkan"/>
    </extensions>
</registry>
"#;

    /// Input files laid out in a temporary directory.
    pub struct Workspace {
        pub dir: TempDir,
    }

    impl Workspace {
        pub fn new() -> Self {
            let dir = tempfile::tempdir().unwrap();
            fs::write(dir.path().join("vk.xml"), VK_XML).unwrap();
            fs::write(dir.path().join("video.xml"), VIDEO_XML).unwrap();
            fs::create_dir(dir.path().join("configs")).unwrap();
            Workspace { dir }
        }

        pub fn root(&self) -> &Path {
            self.dir.path()
        }

        pub fn configs(&self) -> PathBuf {
            self.root().join("configs")
        }

        pub fn out(&self) -> PathBuf {
            self.root().join("out")
        }

        /// Write a file relative to the config directory.
        pub fn config_file(&self, name: &str, contents: &str) -> PathBuf {
            let path = self.configs().join(name);
            fs::write(&path, contents).unwrap();
            path
        }

        /// Write a header relative to `include/`.
        pub fn header(&self, relative: &str) -> PathBuf {
            let path = self.root().join("include").join(relative);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, "#pragma once\n").unwrap();
            path
        }

        pub fn request(&self, target: &str) -> RunRequest {
            RunRequest {
                target: target.to_string(),
                directory: self.out(),
                registry: self.root().join("vk.xml"),
                video: self.root().join("video.xml"),
                configs: self.configs(),
                ..RunRequest::default()
            }
        }

        /// Every file under the output directory.
        pub fn output_files(&self) -> Vec<PathBuf> {
            match fs::read_dir(self.out()) {
                Ok(entries) => entries.map(|e| e.unwrap().path()).collect(),
                Err(_) => Vec::new(),
            }
        }
    }
}
