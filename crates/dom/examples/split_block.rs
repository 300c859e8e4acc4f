//! Split example - pressing Enter in the middle of a formatted block

use dom::iterate::remove_nested_elements_with_tag_name;
use dom::{clone_tree, fragment_to_string, DomArena, DomSerializer, SplitDirection};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // <div block>Hello <strong>wo|rld</strong>!</div>, caret after "wo"
    let mut arena = DomArena::new();
    let block = arena.create_block_element();
    let hello = arena.create_text("Hello ");
    let strong = arena.create_element("strong");
    let left = arena.create_text("wo");
    let marker = arena.create_text("");
    let right = arena.create_text("rld");
    let bang = arena.create_text("!");
    arena.append_child(block, hello)?;
    arena.append_child(block, strong)?;
    arena.append_child(strong, left)?;
    arena.append_child(strong, marker)?;
    arena.append_child(strong, right)?;
    arena.append_child(block, bang)?;

    println!(
        "Block: {}",
        DomSerializer::new().inner_html(&arena, block)?
    );

    let caret = arena.create_text("");
    let before = clone_tree(&mut arena, block, marker, caret, SplitDirection::Before)?;
    let after = clone_tree(&mut arena, block, marker, caret, SplitDirection::After)?;

    println!("Before: {}", fragment_to_string(&arena, before)?);
    println!("After:  {}", fragment_to_string(&arena, after)?);

    // Pasted content should not carry bold into the new block
    remove_nested_elements_with_tag_name(&mut arena, after, "strong")?;
    println!("Plain:  {}", fragment_to_string(&arena, after)?);

    Ok(())
}
