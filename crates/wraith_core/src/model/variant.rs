//! Variant payloads and their editors.
//!
//! Editors borrow the payload and the owning model's dirty set at the
//! same time, so every variant setter marks its property without going
//! back through the model.

use wraith_shared::constants::{
    DEFAULT_LINE_WIDTH, DEFAULT_TEXT_BACKGROUND, DEFAULT_TEXT_OPACITY, TEXT_FLAG_ALIGN_LEFT,
    TEXT_FLAG_ALIGN_RIGHT, TEXT_FLAG_DEFAULT_BACKGROUND, TEXT_FLAG_SEE_THROUGH, TEXT_FLAG_SHADOW,
};
use wraith_shared::property::VariantKind;
use wraith_shared::{Color, PropertyId, TextAlignment, ViewTransform};

use super::DirtySet;
use crate::host::HostTypes;

/// Variant-specific state of a model.
#[derive(Clone, Debug)]
pub enum ModelKind<H: HostTypes> {
    /// Block-shaped model.
    Block(BlockModel<H>),
    /// Item-shaped model.
    Item(ItemModel<H>),
    /// Text model.
    Text(TextModel<H>),
}

impl<H: HostTypes> ModelKind<H> {
    /// Variant tag.
    #[must_use]
    pub const fn variant(&self) -> VariantKind {
        match self {
            Self::Block(_) => VariantKind::Block,
            Self::Item(_) => VariantKind::Item,
            Self::Text(_) => VariantKind::Text,
        }
    }
}

// =============================================================================
// BLOCK
// =============================================================================

/// Displays a block state.
#[derive(Clone, Debug)]
pub struct BlockModel<H: HostTypes> {
    block: H::BlockState,
}

impl<H: HostTypes> BlockModel<H> {
    /// Creates a block payload.
    #[must_use]
    pub fn new(block: H::BlockState) -> Self {
        Self { block }
    }

    /// Displayed block state.
    #[must_use]
    pub fn block(&self) -> &H::BlockState {
        &self.block
    }
}

impl<H: HostTypes> Default for BlockModel<H> {
    fn default() -> Self {
        Self::new(H::BlockState::default())
    }
}

/// Mutable view of a block model.
pub struct BlockEditor<'a, H: HostTypes> {
    payload: &'a mut BlockModel<H>,
    dirty: &'a mut DirtySet,
}

impl<'a, H: HostTypes> BlockEditor<'a, H> {
    pub(crate) fn new(payload: &'a mut BlockModel<H>, dirty: &'a mut DirtySet) -> Self {
        Self { payload, dirty }
    }

    /// Displayed block state.
    #[must_use]
    pub fn block(&self) -> &H::BlockState {
        &self.payload.block
    }

    /// Replaces the block state.
    pub fn set_block(&mut self, block: H::BlockState) -> &mut Self {
        self.payload.block = block;
        self.dirty.mark(PropertyId::BlockState);
        self
    }
}

// =============================================================================
// ITEM
// =============================================================================

/// Displays an item stack.
#[derive(Clone, Debug)]
pub struct ItemModel<H: HostTypes> {
    item: H::ItemStack,
    view: ViewTransform,
}

impl<H: HostTypes> ItemModel<H> {
    /// Creates an item payload with no view transform.
    #[must_use]
    pub fn new(item: H::ItemStack) -> Self {
        Self {
            item,
            view: ViewTransform::None,
        }
    }

    /// Displayed stack.
    #[must_use]
    pub fn item(&self) -> &H::ItemStack {
        &self.item
    }

    /// Display transform.
    #[must_use]
    pub const fn view_transform(&self) -> ViewTransform {
        self.view
    }
}

impl<H: HostTypes> Default for ItemModel<H> {
    fn default() -> Self {
        Self::new(H::ItemStack::default())
    }
}

/// Mutable view of an item model.
pub struct ItemEditor<'a, H: HostTypes> {
    payload: &'a mut ItemModel<H>,
    dirty: &'a mut DirtySet,
}

impl<'a, H: HostTypes> ItemEditor<'a, H> {
    pub(crate) fn new(payload: &'a mut ItemModel<H>, dirty: &'a mut DirtySet) -> Self {
        Self { payload, dirty }
    }

    /// Displayed stack.
    #[must_use]
    pub fn item(&self) -> &H::ItemStack {
        &self.payload.item
    }

    /// Display transform.
    #[must_use]
    pub fn view_transform(&self) -> ViewTransform {
        self.payload.view
    }

    /// Replaces the stack.
    pub fn set_item(&mut self, item: H::ItemStack) -> &mut Self {
        self.payload.item = item;
        self.dirty.mark(PropertyId::ItemStack);
        self
    }

    /// Replaces the display transform.
    pub fn set_view_transform(&mut self, view: ViewTransform) -> &mut Self {
        self.payload.view = view;
        self.dirty.mark(PropertyId::ItemView);
        self
    }

    /// Raw model, no display transform.
    pub fn no_view_transform(&mut self) -> &mut Self {
        self.set_view_transform(ViewTransform::None)
    }

    /// Left hand, third person.
    pub fn third_person_left_view(&mut self) -> &mut Self {
        self.set_view_transform(ViewTransform::ThirdPersonLeft)
    }

    /// Right hand, third person.
    pub fn third_person_right_view(&mut self) -> &mut Self {
        self.set_view_transform(ViewTransform::ThirdPersonRight)
    }

    /// Left hand, first person.
    pub fn first_person_left_view(&mut self) -> &mut Self {
        self.set_view_transform(ViewTransform::FirstPersonLeft)
    }

    /// Right hand, first person.
    pub fn first_person_right_view(&mut self) -> &mut Self {
        self.set_view_transform(ViewTransform::FirstPersonRight)
    }

    /// Worn on the head.
    pub fn head_view(&mut self) -> &mut Self {
        self.set_view_transform(ViewTransform::Head)
    }

    /// Inventory slot.
    pub fn gui_view(&mut self) -> &mut Self {
        self.set_view_transform(ViewTransform::Gui)
    }

    /// Dropped item.
    pub fn ground_view(&mut self) -> &mut Self {
        self.set_view_transform(ViewTransform::Ground)
    }

    /// Item frame.
    pub fn fixed_view(&mut self) -> &mut Self {
        self.set_view_transform(ViewTransform::Fixed)
    }
}

// =============================================================================
// TEXT
// =============================================================================

/// Displays rich text.
#[derive(Clone, Debug)]
pub struct TextModel<H: HostTypes> {
    text: H::Text,
    line_width: i32,
    background: Color,
    opacity: i8,
    shadow: bool,
    see_through: bool,
    default_background: bool,
    alignment: TextAlignment,
}

impl<H: HostTypes> TextModel<H> {
    /// Creates a text payload with client defaults.
    #[must_use]
    pub fn new(text: H::Text) -> Self {
        Self {
            text,
            line_width: DEFAULT_LINE_WIDTH,
            background: Color::from_argb(DEFAULT_TEXT_BACKGROUND),
            opacity: DEFAULT_TEXT_OPACITY,
            shadow: false,
            see_through: false,
            default_background: false,
            alignment: TextAlignment::Center,
        }
    }

    /// Text component.
    #[must_use]
    pub fn text(&self) -> &H::Text {
        &self.text
    }

    /// Wrap width.
    #[must_use]
    pub const fn line_width(&self) -> i32 {
        self.line_width
    }

    /// Background color.
    #[must_use]
    pub const fn background_color(&self) -> Color {
        self.background
    }

    /// Raw opacity byte. `-1` is fully opaque.
    #[must_use]
    pub const fn text_opacity(&self) -> i8 {
        self.opacity
    }

    /// Drop shadow.
    #[must_use]
    pub const fn has_shadow(&self) -> bool {
        self.shadow
    }

    /// Rendered through blocks.
    #[must_use]
    pub const fn is_see_through(&self) -> bool {
        self.see_through
    }

    /// Uses the client's default background.
    #[must_use]
    pub const fn uses_default_background(&self) -> bool {
        self.default_background
    }

    /// Alignment.
    #[must_use]
    pub const fn alignment(&self) -> TextAlignment {
        self.alignment
    }

    /// Packs the style flags byte.
    #[must_use]
    pub const fn style_flags(&self) -> i8 {
        let mut flags = 0;
        if self.shadow {
            flags |= TEXT_FLAG_SHADOW;
        }
        if self.see_through {
            flags |= TEXT_FLAG_SEE_THROUGH;
        }
        if self.default_background {
            flags |= TEXT_FLAG_DEFAULT_BACKGROUND;
        }
        match self.alignment {
            TextAlignment::Center => {}
            TextAlignment::Left => flags |= TEXT_FLAG_ALIGN_LEFT,
            TextAlignment::Right => flags |= TEXT_FLAG_ALIGN_RIGHT,
        }
        flags
    }
}

impl<H: HostTypes> Default for TextModel<H> {
    fn default() -> Self {
        Self::new(H::Text::default())
    }
}

/// Mutable view of a text model.
pub struct TextEditor<'a, H: HostTypes> {
    payload: &'a mut TextModel<H>,
    dirty: &'a mut DirtySet,
}

impl<'a, H: HostTypes> TextEditor<'a, H> {
    pub(crate) fn new(payload: &'a mut TextModel<H>, dirty: &'a mut DirtySet) -> Self {
        Self { payload, dirty }
    }

    /// Read-only view of the payload.
    #[must_use]
    pub fn get(&self) -> &TextModel<H> {
        self.payload
    }

    /// Replaces the text.
    pub fn set_text(&mut self, text: H::Text) -> &mut Self {
        self.payload.text = text;
        self.dirty.mark(PropertyId::Text);
        self
    }

    /// Sets the wrap width.
    pub fn set_line_width(&mut self, width: i32) -> &mut Self {
        self.payload.line_width = width;
        self.dirty.mark(PropertyId::LineWidth);
        self
    }

    /// Sets the background color.
    pub fn set_background_color(&mut self, color: Color) -> &mut Self {
        self.payload.background = color;
        self.dirty.mark(PropertyId::BackgroundColor);
        self
    }

    /// Sets the raw opacity byte. Any value is accepted.
    pub fn set_text_opacity(&mut self, opacity: i8) -> &mut Self {
        self.payload.opacity = opacity;
        self.dirty.mark(PropertyId::TextOpacity);
        self
    }

    /// Toggles the drop shadow.
    pub fn set_shadow(&mut self, shadow: bool) -> &mut Self {
        self.payload.shadow = shadow;
        self.dirty.mark(PropertyId::TextStyle);
        self
    }

    /// Toggles rendering through blocks.
    pub fn set_see_through(&mut self, see_through: bool) -> &mut Self {
        self.payload.see_through = see_through;
        self.dirty.mark(PropertyId::TextStyle);
        self
    }

    /// Toggles the client's default background.
    pub fn set_default_background(&mut self, default_background: bool) -> &mut Self {
        self.payload.default_background = default_background;
        self.dirty.mark(PropertyId::TextStyle);
        self
    }

    /// Sets the alignment.
    pub fn set_alignment(&mut self, alignment: TextAlignment) -> &mut Self {
        self.payload.alignment = alignment;
        self.dirty.mark(PropertyId::TextStyle);
        self
    }
}
