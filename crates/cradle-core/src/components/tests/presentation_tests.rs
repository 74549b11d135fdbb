use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use console::Color;

use crate::components::logo::LogoComponent;
use crate::components::title::TitleComponent;
use crate::kernel::component::Component;
use crate::kernel::context::{AppContext, StopHandle};
use crate::kernel::registry::ServiceRegistry;

#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn test_context() -> AppContext {
    AppContext::new(Arc::new(ServiceRegistry::new()), StopHandle::new())
}

#[test]
fn test_title_component() {
    let mut title = TitleComponent::new("Cradle demo");
    assert_eq!(title.title(), "Cradle demo");
    assert!(title.is_initialized());
    assert!(title.initialize(&test_context()).unwrap());

    title.set_title("renamed");
    assert_eq!(title.title(), "renamed");
    assert!(!TitleComponent::executable_name().is_empty());
    assert!(TitleComponent::default().title().is_empty());
}

#[test]
fn test_logo_printed_once_on_initialize() {
    let out = SharedBuffer::default();
    let mut logo = LogoComponent::with_logo("<< LOGO >>", Color::Cyan).with_writer(out.clone());
    assert!(!logo.is_initialized());

    assert!(logo.initialize(&test_context()).unwrap());
    assert!(logo.is_initialized());
    logo.process(&test_context()).unwrap();

    let printed = out.contents();
    assert!(printed.contains("<< LOGO >>"));
    assert_eq!(printed.matches("<< LOGO >>").count(), 1);
}

#[test]
fn test_default_logo_and_empty_logo() {
    let mut logo = LogoComponent::default();
    assert!(!logo.logo().is_empty());

    let out = SharedBuffer::default();
    logo = logo.with_writer(out.clone());
    logo.set_logo("", Color::Red);
    assert!(logo.initialize(&test_context()).unwrap());
    assert!(out.contents().is_empty());
}
