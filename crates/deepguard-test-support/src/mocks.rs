//! Mock implementations of core port traits.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

use anyhow::{anyhow, bail};
use deepguard_core::inference::{InputShape, ModelOutput};
use deepguard_core::ports::{
    AnnotationSink, Classifier, ImageEntry, ImageSource, ProgressEvent, ProgressSink,
    TextRenderer,
};
use image::{DynamicImage, Rgb, RgbImage};
use ndarray::Array4;

/// Mock implementation of `ImageSource` for testing.
///
/// Serves named in-memory images. Names registered with
/// [`MockImageSource::with_broken`] fail to load.
pub struct MockImageSource {
    images: Vec<(String, Option<DynamicImage>)>,
    load_count: Arc<Mutex<usize>>,
}

impl MockImageSource {
    /// Creates a new mock source with the given named images.
    #[must_use]
    pub fn new(images: Vec<(&str, DynamicImage)>) -> Self {
        Self {
            images: images
                .into_iter()
                .map(|(name, image)| (name.to_string(), Some(image)))
                .collect(),
            load_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Creates an empty mock source.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(vec![])
    }

    /// Adds a file that is listed but cannot be decoded.
    #[must_use]
    pub fn with_broken(mut self, name: &str) -> Self {
        self.images.push((name.to_string(), None));
        self
    }

    /// Returns the number of `load` calls.
    #[must_use]
    pub fn load_count(&self) -> usize {
        *self
            .load_count
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl ImageSource for MockImageSource {
    fn entries(&self) -> anyhow::Result<Vec<ImageEntry>> {
        Ok(self
            .images
            .iter()
            .map(|(name, _)| ImageEntry::new(name.clone(), format!("mock/{name}")))
            .collect())
    }

    fn load(&self, entry: &ImageEntry) -> anyhow::Result<DynamicImage> {
        if let Ok(mut c) = self.load_count.lock() {
            *c += 1;
        }
        match self.images.iter().find(|(name, _)| *name == entry.name) {
            Some((_, Some(image))) => Ok(image.clone()),
            Some((_, None)) => bail!("cannot decode {}", entry.name),
            None => Err(anyhow!("no such image: {}", entry.name)),
        }
    }

    fn describe(&self) -> String {
        "mock".to_string()
    }
}

/// Classifier stub returning queued confidences in call order.
///
/// Once the queue is exhausted every call fails.
pub struct StubClassifier {
    shape: InputShape,
    queue: RefCell<VecDeque<anyhow::Result<f32>>>,
    inputs: RefCell<Vec<Array4<f32>>>,
}

impl StubClassifier {
    /// Creates a stub for a 4x4 NHWC model returning `confidences` in order.
    #[must_use]
    pub fn new(confidences: &[f32]) -> Self {
        Self::with_shape(InputShape::nhwc(4, 4), confidences)
    }

    /// Creates a stub with a specific input shape.
    #[must_use]
    pub fn with_shape(shape: InputShape, confidences: &[f32]) -> Self {
        Self {
            shape,
            queue: RefCell::new(confidences.iter().copied().map(Ok).collect()),
            inputs: RefCell::new(Vec::new()),
        }
    }

    /// Queues a runtime failure after the already queued confidences.
    #[must_use]
    pub fn then_fail(self, message: &str) -> Self {
        self.queue.borrow_mut().push_back(Err(anyhow!("{message}")));
        self
    }

    /// Returns the number of forward passes.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.inputs.borrow().len()
    }

    /// Returns the input tensors of every forward pass, in call order.
    #[must_use]
    pub fn inputs(&self) -> Vec<Array4<f32>> {
        self.inputs.borrow().clone()
    }
}

impl Classifier for StubClassifier {
    fn input_shape(&self) -> InputShape {
        self.shape
    }

    fn classify(&self, input: &Array4<f32>) -> anyhow::Result<ModelOutput> {
        self.inputs.borrow_mut().push(input.clone());
        let confidence = self
            .queue
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(anyhow!("stub classifier exhausted")))?;
        Ok(ModelOutput::new(vec![1, 1], vec![confidence]))
    }
}

/// Text renderer that records every draw call.
///
/// Each character is `char_width` pixels wide. Nothing is painted.
pub struct RecordingRenderer {
    char_width: u32,
    calls: Mutex<Vec<DrawCall>>,
}

/// One recorded `draw_text` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawCall {
    /// Text drawn.
    pub text: String,
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Text colour.
    pub color: Rgb<u8>,
}

impl RecordingRenderer {
    /// Creates a renderer with 10 px wide characters.
    #[must_use]
    pub fn new() -> Self {
        Self {
            char_width: 10,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Returns all recorded draw calls.
    #[must_use]
    pub fn calls(&self) -> Vec<DrawCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the recorded texts grouped per annotated image.
    #[must_use]
    pub fn headers(&self) -> Vec<Vec<String>> {
        self.calls()
            .chunks(3)
            .map(|chunk| chunk.iter().map(|c| c.text.clone()).collect())
            .collect()
    }
}

impl Default for RecordingRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextRenderer for RecordingRenderer {
    #[allow(clippy::cast_possible_truncation)]
    fn text_size(&self, text: &str) -> (u32, u32) {
        (text.chars().count() as u32 * self.char_width, 16)
    }

    fn draw_text(&self, _canvas: &mut RgbImage, x: i32, y: i32, text: &str, color: Rgb<u8>) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(DrawCall {
                text: text.to_string(),
                x,
                y,
                color,
            });
    }

    fn describe(&self) -> String {
        "recording renderer".to_string()
    }
}

/// Mock implementation of `AnnotationSink` capturing saved images.
pub struct MockAnnotationSink {
    saved: Mutex<Vec<(String, RgbImage)>>,
    fail_prepare: bool,
    prepare_count: Mutex<usize>,
}

impl MockAnnotationSink {
    /// Creates a sink that accepts everything.
    #[must_use]
    pub fn new() -> Self {
        Self {
            saved: Mutex::new(Vec::new()),
            fail_prepare: false,
            prepare_count: Mutex::new(0),
        }
    }

    /// Creates a sink whose `prepare` fails.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            fail_prepare: true,
            ..Self::new()
        }
    }

    /// Returns the saved images by file name, in save order.
    #[must_use]
    pub fn saved(&self) -> Vec<(String, RgbImage)> {
        self.saved
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the number of `prepare` calls.
    #[must_use]
    pub fn prepare_count(&self) -> usize {
        *self
            .prepare_count
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MockAnnotationSink {
    fn default() -> Self {
        Self::new()
    }
}

impl AnnotationSink for MockAnnotationSink {
    fn prepare(&self) -> anyhow::Result<()> {
        if let Ok(mut c) = self.prepare_count.lock() {
            *c += 1;
        }
        if self.fail_prepare {
            bail!("read-only destination");
        }
        Ok(())
    }

    fn save(&self, entry: &ImageEntry, image: &RgbImage) -> anyhow::Result<()> {
        self.saved
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((entry.name.clone(), image.clone()));
        Ok(())
    }

    fn describe(&self) -> String {
        "mock sink".to_string()
    }
}

/// Mock implementation of `ProgressSink` for testing.
///
/// Captures events for later assertions.
pub struct MockProgressSink {
    events: Arc<Mutex<Vec<ProgressEvent>>>,
}

impl MockProgressSink {
    /// Creates a new mock progress sink.
    #[must_use]
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Returns all captured events.
    #[must_use]
    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the number of `Started` events.
    #[must_use]
    pub fn started_count(&self) -> usize {
        self.count(|e| matches!(e, ProgressEvent::Started { .. }))
    }

    /// Returns the number of `Completed` events.
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.count(|e| matches!(e, ProgressEvent::Completed { .. }))
    }

    /// Returns the number of `Failed` events.
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.count(|e| matches!(e, ProgressEvent::Failed { .. }))
    }

    /// Returns the final counts from the `Finished` event, if any.
    #[must_use]
    pub fn finished_counts(&self) -> Option<(usize, usize)> {
        self.events().iter().find_map(|e| match e {
            ProgressEvent::Finished { scored, failed } => Some((*scored, *failed)),
            _ => None,
        })
    }

    fn count(&self, pred: impl Fn(&ProgressEvent) -> bool) -> usize {
        self.events().iter().filter(|e| pred(e)).count()
    }
}

impl Default for MockProgressSink {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for MockProgressSink {
    fn on_event(&self, event: ProgressEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_image_source_broken_entry() {
        let source = MockImageSource::new(vec![("a.jpg", DynamicImage::new_rgb8(4, 4))])
            .with_broken("b.jpg");

        let entries = source.entries().unwrap();
        assert_eq!(entries.len(), 2);
        assert!(source.load(&entries[0]).is_ok());
        assert!(source.load(&entries[1]).is_err());
        assert_eq!(source.load_count(), 2);
    }

    #[test]
    fn test_stub_classifier_queue() {
        let stub = StubClassifier::new(&[0.25]).then_fail("boom");
        let input = Array4::zeros((1, 4, 4, 3));

        let out = stub.classify(&input).unwrap();
        assert_eq!(out.values, vec![0.25]);
        assert!(stub.classify(&input).is_err());
        assert!(stub.classify(&input).is_err());
        assert_eq!(stub.call_count(), 3);
        assert_eq!(stub.inputs()[0].shape(), &[1, 4, 4, 3]);
    }

    #[test]
    fn test_recording_renderer() {
        let renderer = RecordingRenderer::new();
        let mut canvas = RgbImage::new(4, 4);
        renderer.draw_text(&mut canvas, 1, 2, "abc", Rgb([1, 2, 3]));

        assert_eq!(renderer.text_size("abc"), (30, 16));
        assert_eq!(renderer.calls()[0].text, "abc");
        assert_eq!(*canvas.get_pixel(1, 2), Rgb([0, 0, 0]));
    }

    #[test]
    fn test_mock_progress_sink() {
        let sink = MockProgressSink::new();

        sink.on_event(ProgressEvent::Started {
            file: "test.jpg".into(),
            index: 0,
            total: 1,
        });
        sink.on_event(ProgressEvent::Finished {
            scored: 1,
            failed: 0,
        });

        assert_eq!(sink.started_count(), 1);
        assert_eq!(sink.finished_counts(), Some((1, 0)));
    }
}
